// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Swap response types

use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// JSON response for POST /v1/swap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    /// Base64-encoded PNG of the composited image
    pub image: String,
    /// Pipeline that produced the result ("landmarks" or "bounding-box")
    pub method: String,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl SwapResponse {
    pub fn new(
        image: String,
        method: &str,
        width: u32,
        height: u32,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            image,
            method: method.to_string(),
            width,
            height,
            processing_time_ms,
        }
    }
}

/// Raw PNG response for POST /swap
pub fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}
