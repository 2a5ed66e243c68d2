// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face swap engine
//!
//! Ties the pipeline together: landmark-based triangle warping when the mesh
//! model is available, bounding-box replacement as the fallback. The fallback
//! is taken whenever the landmark path fails for any reason, matching the
//! original service behavior.

use image::DynamicImage;
use image::RgbImage;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::vision::detector::{FaceDetector, FaceRect};
use crate::vision::mesh::{FaceMeshModel, LandmarkPoint};
use crate::vision::swap::blend::{
    composite, ellipse_mask, feather_mask, feather_sigma, match_color, polygon_mask,
};
use crate::vision::swap::triangulation::{convex_hull, triangulate_landmarks};
use crate::vision::swap::warp::{warp_triangle, Triangle};

/// Errors from the swap pipeline
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("could not detect a face in the source image")]
    NoSourceFace,

    #[error("could not detect a face in the target image")]
    NoTargetFace,

    #[error("face region is degenerate after clamping to image bounds")]
    DegenerateRegion,

    #[error("no face processing engine is available")]
    Unavailable,

    #[error("face processing failed: {0}")]
    Processing(String),
}

/// Which pipeline produced the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMethod {
    /// Landmark triangulation and per-triangle warping
    Landmarks,
    /// Detected-rectangle resize and blend
    BoundingBox,
}

impl SwapMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapMethod::Landmarks => "landmarks",
            SwapMethod::BoundingBox => "bounding-box",
        }
    }
}

/// Result of a swap, with the method that produced it
#[derive(Debug)]
pub struct SwapOutcome {
    pub image: RgbImage,
    pub method: SwapMethod,
}

/// Paths for the swap engine's models
#[derive(Debug, Clone, Default)]
pub struct SwapEngineConfig {
    /// Path to the face-mesh ONNX model (optional)
    pub mesh_model_path: Option<std::path::PathBuf>,
    /// Path to the SeetaFace frontal model (optional)
    pub face_detect_model_path: Option<std::path::PathBuf>,
}

/// The face swap engine
///
/// Models load lazily and independently; a missing model file disables its
/// path rather than failing startup.
pub struct FaceSwapper {
    mesh: Option<Arc<FaceMeshModel>>,
    detector: Option<Arc<FaceDetector>>,
}

impl FaceSwapper {
    /// Create an engine from already-loaded models (used by tests)
    pub fn with_models(
        mesh: Option<Arc<FaceMeshModel>>,
        detector: Option<Arc<FaceDetector>>,
    ) -> Self {
        Self { mesh, detector }
    }

    /// Load models from the given configuration
    pub fn new(config: SwapEngineConfig) -> Self {
        let mesh = match &config.mesh_model_path {
            Some(path) => match FaceMeshModel::new(path) {
                Ok(model) => {
                    info!("✅ Face-mesh model loaded from {}", path.display());
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!("⚠️ Failed to load face-mesh model from {}: {}", path.display(), e);
                    None
                }
            },
            None => None,
        };

        let detector = match &config.face_detect_model_path {
            Some(path) => match FaceDetector::new(path) {
                Ok(det) => {
                    info!("✅ Face detection model loaded from {}", path.display());
                    Some(Arc::new(det))
                }
                Err(e) => {
                    warn!(
                        "⚠️ Failed to load face detection model from {}: {}",
                        path.display(),
                        e
                    );
                    None
                }
            },
            None => None,
        };

        Self { mesh, detector }
    }

    /// Whether the landmark path is available
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Whether the bounding-box fallback is available
    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    /// Whether any swap path can run
    pub fn is_available(&self) -> bool {
        self.has_mesh() || self.has_detector()
    }

    /// Replace the face in `target` with the face from `source`
    ///
    /// Tries the landmark path first; any failure there falls through to the
    /// bounding-box path when the detector is loaded.
    pub fn swap(
        &self,
        source: &DynamicImage,
        target: &DynamicImage,
    ) -> Result<SwapOutcome, SwapError> {
        if !self.is_available() {
            return Err(SwapError::Unavailable);
        }

        if let Some(mesh) = &self.mesh {
            match self.swap_with_landmarks(mesh, source, target) {
                Ok(image) => {
                    return Ok(SwapOutcome {
                        image,
                        method: SwapMethod::Landmarks,
                    })
                }
                Err(e) if self.detector.is_some() => {
                    warn!("Landmark swap failed ({}), trying bounding-box fallback", e);
                }
                Err(e) => return Err(e),
            }
        }

        let detector = self.detector.as_ref().ok_or(SwapError::Unavailable)?;
        let image = self.swap_with_rects(detector, source, target)?;
        Ok(SwapOutcome {
            image,
            method: SwapMethod::BoundingBox,
        })
    }

    /// Landmark path: run the mesh model on both images, then warp
    fn swap_with_landmarks(
        &self,
        mesh: &FaceMeshModel,
        source: &DynamicImage,
        target: &DynamicImage,
    ) -> Result<RgbImage, SwapError> {
        let src_landmarks = mesh
            .landmarks(source)
            .map_err(|e| SwapError::Processing(e.to_string()))?
            .ok_or(SwapError::NoSourceFace)?;
        let dst_landmarks = mesh
            .landmarks(target)
            .map_err(|e| SwapError::Processing(e.to_string()))?
            .ok_or(SwapError::NoTargetFace)?;

        swap_with_landmark_sets(
            &source.to_rgb8(),
            &target.to_rgb8(),
            &src_landmarks.points,
            &dst_landmarks.points,
        )
    }

    /// Bounding-box path: detect face rectangles, then resize and blend
    fn swap_with_rects(
        &self,
        detector: &FaceDetector,
        source: &DynamicImage,
        target: &DynamicImage,
    ) -> Result<RgbImage, SwapError> {
        let dst_rect = detector
            .detect_largest(target)
            .map_err(|e| SwapError::Processing(e.to_string()))?
            .ok_or(SwapError::NoTargetFace)?;

        // Missing source face falls back to the whole source image
        let src_rect = detector
            .detect_largest(source)
            .map_err(|e| SwapError::Processing(e.to_string()))?;

        swap_into_rect(&source.to_rgb8(), &target.to_rgb8(), src_rect, dst_rect)
    }
}

/// Warp the source face onto the target through corresponding landmark sets
///
/// Triangulation is built on the target landmarks and the index triples are
/// applied to both sets, so the meshes correspond point-for-point. The
/// warped face is composited through the feathered convex-hull mask.
pub fn swap_with_landmark_sets(
    source: &RgbImage,
    target: &RgbImage,
    src_points: &[LandmarkPoint],
    dst_points: &[LandmarkPoint],
) -> Result<RgbImage, SwapError> {
    if src_points.len() != dst_points.len() {
        return Err(SwapError::Processing(format!(
            "landmark sets differ in length: {} vs {}",
            src_points.len(),
            dst_points.len()
        )));
    }

    let triangles = triangulate_landmarks(dst_points);
    if triangles.is_empty() {
        return Err(SwapError::DegenerateRegion);
    }
    debug!("Warping {} triangles", triangles.len());

    let mut canvas = target.clone();
    for [i, j, k] in &triangles {
        let t_src = tri_of(src_points, *i, *j, *k);
        let t_dst = tri_of(dst_points, *i, *j, *k);
        warp_triangle(source, &mut canvas, &t_src, &t_dst);
    }

    let hull = convex_hull(dst_points);
    if hull.len() < 3 {
        return Err(SwapError::DegenerateRegion);
    }

    let mask = polygon_mask(target.width(), target.height(), &hull);

    // Feather radius from the hull's extent
    let (hull_w, hull_h) = hull_extent(&hull);
    let feathered = feather_mask(&mask, feather_sigma(hull_w, hull_h));

    match_color(&mut canvas, target, &mask);
    Ok(composite(target, &canvas, &feathered))
}

/// Resize the source face region into the target rectangle and blend
///
/// `src_rect` of `None` uses the whole source image. The target rectangle is
/// clamped to the image; an empty clamped region is an error.
pub fn swap_into_rect(
    source: &RgbImage,
    target: &RgbImage,
    src_rect: Option<FaceRect>,
    dst_rect: FaceRect,
) -> Result<RgbImage, SwapError> {
    let dst_rect = dst_rect
        .clamped(target.width(), target.height())
        .ok_or(SwapError::DegenerateRegion)?;

    let src_rect = src_rect
        .and_then(|r| r.clamped(source.width(), source.height()))
        .unwrap_or(FaceRect {
            x: 0,
            y: 0,
            width: source.width(),
            height: source.height(),
        });
    if src_rect.width == 0 || src_rect.height == 0 {
        return Err(SwapError::NoSourceFace);
    }

    let src_face = image::imageops::crop_imm(
        source,
        src_rect.x as u32,
        src_rect.y as u32,
        src_rect.width,
        src_rect.height,
    )
    .to_image();

    let resized = image::imageops::resize(
        &src_face,
        dst_rect.width,
        dst_rect.height,
        image::imageops::FilterType::Triangle,
    );

    let mut canvas = target.clone();
    image::imageops::replace(&mut canvas, &resized, dst_rect.x as i64, dst_rect.y as i64);

    let mask = ellipse_mask(target.width(), target.height(), &dst_rect);
    let feathered = feather_mask(&mask, feather_sigma(dst_rect.width, dst_rect.height));

    match_color(&mut canvas, target, &mask);
    Ok(composite(target, &canvas, &feathered))
}

fn tri_of(points: &[LandmarkPoint], i: usize, j: usize, k: usize) -> Triangle {
    [
        (points[i].x, points[i].y),
        (points[j].x, points[j].y),
        (points[k].x, points[k].y),
    ]
}

fn hull_extent(hull: &[(f32, f32)]) -> (u32, u32) {
    let min_x = hull.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let max_x = hull.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let min_y = hull.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_y = hull.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
    (
        (max_x - min_x).max(1.0) as u32,
        (max_y - min_y).max(1.0) as u32,
    )
}
