// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frontal face detection fallback
//!
//! Used when the landmark model is unavailable or does not find a face.
//! Wraps the SeetaFace frontal detector (rustface). Detector instances are
//! not shareable across threads, so the model bytes are kept and a detector
//! is constructed per call.

use anyhow::{Context, Result};
use image::DynamicImage;
use rustface::{create_detector_with_model, read_model, ImageData};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Minimum face edge length in pixels considered a detection
pub const MIN_FACE_SIZE: u32 = 80;

/// An axis-aligned face bounding box in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl FaceRect {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Clamp the rectangle to an image of the given dimensions.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the image.
    pub fn clamped(&self, image_width: u32, image_height: u32) -> Option<FaceRect> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width as i32).min(image_width as i32);
        let y2 = (self.y + self.height as i32).min(image_height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(FaceRect {
            x: x1,
            y: y1,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }
}

/// SeetaFace frontal face detector
pub struct FaceDetector {
    model_bytes: Vec<u8>,
}

impl std::fmt::Debug for FaceDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceDetector")
            .field("model_bytes", &self.model_bytes.len())
            .finish()
    }
}

impl FaceDetector {
    /// Load the detection model from disk
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!(
                "face detection model not found: {}",
                model_path.display()
            );
        }

        let model_bytes = std::fs::read(model_path).context(format!(
            "Failed to read face detection model from {}",
            model_path.display()
        ))?;

        // Validate once at load so a corrupt file fails fast
        read_model(Cursor::new(&model_bytes[..]))
            .context("Face detection model is not a valid SeetaFace model")?;

        info!(
            "Face detection model loaded from {} ({} bytes)",
            model_path.display(),
            model_bytes.len()
        );

        Ok(Self { model_bytes })
    }

    /// Detect the largest face in the image
    ///
    /// Runs on a grayscale copy and returns `None` when no face at least
    /// MIN_FACE_SIZE pixels across is found.
    pub fn detect_largest(&self, image: &DynamicImage) -> Result<Option<FaceRect>> {
        let model = read_model(Cursor::new(&self.model_bytes[..]))
            .context("Failed to reload face detection model")?;
        let mut detector = create_detector_with_model(model);
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        let mut image_data = ImageData::new(&gray, width, height);

        let faces = detector.detect(&mut image_data);
        debug!("Face detector found {} candidate(s)", faces.len());

        let largest = faces
            .iter()
            .map(|f| {
                let bbox = f.bbox();
                FaceRect {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .max_by_key(|r| r.area());

        Ok(largest)
    }
}
