// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based face replacement
//!
//! This module provides:
//! - Face-mesh landmark extraction (ONNX, 468 points)
//! - Frontal face detection fallback (SeetaFace)
//! - The swap pipeline: triangulation, warping and blending
//!
//! Everything runs on CPU.

pub mod detector;
pub mod image_utils;
pub mod mesh;
pub mod source_cache;
pub mod swap;

pub use detector::{FaceDetector, FaceRect};
pub use image_utils::{
    decode_base64_image, decode_image_bytes, detect_format, encode_png, encode_png_base64,
    ImageError, ImageInfo,
};
pub use mesh::{FaceLandmarks, FaceMeshModel, LandmarkPoint, NUM_LANDMARKS};
pub use source_cache::{SourceCache, SourceStatus};
pub use swap::{
    swap_into_rect, swap_with_landmark_sets, FaceSwapper, SwapEngineConfig, SwapError,
    SwapMethod, SwapOutcome,
};
