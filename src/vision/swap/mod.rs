// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face swap pipeline: triangulation, warping, blending and the engine

pub mod blend;
pub mod engine;
pub mod triangulation;
pub mod warp;

pub use engine::{
    swap_into_rect, swap_with_landmark_sets, FaceSwapper, SwapEngineConfig, SwapError,
    SwapMethod, SwapOutcome,
};
pub use triangulation::{convex_hull, triangulate_landmarks};
