// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face-mesh landmark extraction

pub mod model;
pub mod preprocessing;

pub use model::{FaceLandmarks, FaceMeshModel, LandmarkPoint, NUM_LANDMARKS};
pub use preprocessing::{mesh_scale, preprocess_for_mesh, MESH_INPUT_SIZE};
