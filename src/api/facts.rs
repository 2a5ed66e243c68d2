// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fun fact endpoint

use axum::Json;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The fact pool served by GET /fact
pub const FACTS: &[&str] = &[
    "The human brain has a dedicated region for recognizing faces, the fusiform face area.",
    "Newborns prefer looking at face-like patterns within hours of birth.",
    "Humans can recognize a familiar face in under 400 milliseconds.",
    "No two people have identical faces, not even identical twins under close inspection.",
    "The face has over 40 muscles, more than any other body region of its size.",
    "Seeing faces in clouds or toast is called pareidolia.",
    "A genuine smile engages the muscles around the eyes, not just the mouth.",
    "Face blindness (prosopagnosia) affects roughly 2% of the population.",
    "The distance between the eyes is one of the most stable facial measurements.",
    "Early face detection algorithms scanned images with sliding windows at many scales.",
    "Modern landmark models track hundreds of points on a single face in real time.",
    "Symmetric faces are consistently rated as more familiar, not necessarily more attractive.",
];

/// Response for GET /fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactResponse {
    pub fact: String,
}

/// Pick a random fact
pub fn random_fact() -> &'static str {
    FACTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Faces are interesting.")
}

/// GET /fact - Return a random fun fact
pub async fn fact_handler() -> Json<FactResponse> {
    Json(FactResponse {
        fact: random_fact().to_string(),
    })
}
