// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face-mesh landmark model
//!
//! Wraps a MediaPipe-style face-mesh ONNX export. The model takes a single
//! 192x192 RGB crop and emits 468 landmark coordinates in input space plus a
//! face-presence score. Runs on CPU only.

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::{mesh_scale, preprocess_for_mesh, MESH_INPUT_SIZE};

/// Number of landmarks in the base face mesh
pub const NUM_LANDMARKS: usize = 468;

/// Face-presence score below which a result is treated as "no face"
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// A single detected landmark in original-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The full landmark set for one face
#[derive(Debug, Clone)]
pub struct FaceLandmarks {
    /// 468 points in original-image pixel coordinates
    pub points: Vec<LandmarkPoint>,
    /// Face-presence score (0.0-1.0)
    pub score: f32,
}

/// Face-mesh landmark model (ONNX via ort)
pub struct FaceMeshModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Model output names, in declaration order
    output_names: Vec<String>,
    /// Face-presence threshold
    score_threshold: f32,
}

impl std::fmt::Debug for FaceMeshModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceMeshModel")
            .field("input_name", &self.input_name)
            .field("output_names", &self.output_names)
            .field("score_threshold", &self.score_threshold)
            .finish_non_exhaustive()
    }
}

impl FaceMeshModel {
    /// Load the face-mesh model from an ONNX file
    ///
    /// # Errors
    /// Returns error if the file is missing or ONNX Runtime fails to load it.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("face-mesh model not found: {}", model_path.display());
        }

        info!("Loading face-mesh model from {}", model_path.display());

        // CPU-only execution, same settings as the other vision models
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load face-mesh model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();

        if output_names.is_empty() {
            anyhow::bail!("face-mesh model declares no outputs");
        }

        debug!(
            "Face-mesh model loaded - input: {}, outputs: {:?}",
            input_name, output_names
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_names,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        })
    }

    /// Override the face-presence threshold
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Detect face landmarks in an image
    ///
    /// Returns `Ok(None)` when the model runs but reports no face above the
    /// presence threshold. Coordinates are mapped back to the original image.
    pub fn landmarks(&self, image: &DynamicImage) -> Result<Option<FaceLandmarks>> {
        let tensor = preprocess_for_mesh(image);
        let (scale_x, scale_y) = mesh_scale(image.width(), image.height());

        let mut session = self.session.lock().unwrap();

        let input_value =
            Value::from_array(tensor).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Face-mesh inference failed")?;

        // The landmark tensor is the output with 3 * NUM_LANDMARKS (or more,
        // for refined exports) values; the score output is a single scalar.
        let mut raw_landmarks: Option<Vec<f32>> = None;
        let mut raw_score: Option<f32> = None;

        for name in &self.output_names {
            let tensor = outputs[name.as_str()]
                .try_extract_array::<f32>()
                .context(format!("Failed to extract output '{}'", name))?;
            let values: Vec<f32> = tensor.iter().copied().collect();

            if values.len() >= 3 * NUM_LANDMARKS && values.len() % 3 == 0 {
                if raw_landmarks.is_none() {
                    raw_landmarks = Some(values);
                }
            } else if values.len() == 1 && raw_score.is_none() {
                raw_score = Some(values[0]);
            }
        }

        let raw_landmarks = raw_landmarks
            .ok_or_else(|| anyhow::anyhow!("face-mesh model produced no landmark output"))?;

        // Score output is a logit in MediaPipe exports
        let score = sigmoid(raw_score.unwrap_or(0.0));
        if score < self.score_threshold {
            debug!("Face-mesh score {:.3} below threshold, no face", score);
            return Ok(None);
        }

        let points: Vec<LandmarkPoint> = raw_landmarks
            .chunks_exact(3)
            .take(NUM_LANDMARKS)
            .map(|xyz| LandmarkPoint {
                x: xyz[0] * scale_x,
                y: xyz[1] * scale_y,
                z: xyz[2] * scale_x,
            })
            .collect();

        debug!(
            "Face-mesh found {} landmarks (score {:.3})",
            points.len(),
            score
        );

        Ok(Some(FaceLandmarks { points, score }))
    }

    /// Input edge length the model expects
    pub fn input_size(&self) -> u32 {
        MESH_INPUT_SIZE
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
