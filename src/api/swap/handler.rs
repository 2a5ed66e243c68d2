// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Swap endpoint handlers

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::Multipart;
use image::DynamicImage;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::{SwapRequest, SwapUpload};
use super::response::{png_response, SwapResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::image_utils::{decode_base64_image, decode_image_bytes, encode_png};
use crate::vision::SwapMethod;

/// POST /swap - Replace the face in an uploaded target image
///
/// Multipart form fields:
/// - `target`: the image whose face is replaced (required)
/// - `source`: the face to insert; when absent the fixed source from the
///   static directory is used
///
/// Responds with `image/png` bytes on success, JSON `{"error": ...}` with
/// 400/500/503 otherwise.
pub async fn swap_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = SwapUpload::from_multipart(multipart).await?;
    debug!(
        "Swap upload: target {} bytes, source {}",
        upload.target.len(),
        upload
            .source
            .as_ref()
            .map(|s| format!("{} bytes", s.len()))
            .unwrap_or_else(|| "fixed".to_string())
    );

    let (target, _) = decode_image_bytes(&upload.target).map_err(|e| {
        warn!("Failed to decode target image: {}", e);
        ApiError::InvalidRequest("could not decode target image".to_string())
    })?;

    let source = match upload.source {
        Some(ref bytes) => {
            let (img, _) = decode_image_bytes(bytes).map_err(|e| {
                warn!("Failed to decode uploaded source image: {}", e);
                ApiError::InvalidRequest("could not decode uploaded source image".to_string())
            })?;
            img
        }
        None => fixed_source(&state)?,
    };

    let (image, method, elapsed_ms) = run_swap(&state, &source, &target)?;
    let bytes = encode_png(&image)
        .map_err(|e| ApiError::InternalError(format!("failed to encode output: {}", e)))?;

    info!(
        "Swap complete: {}x{} via {}, {}ms",
        image.width(),
        image.height(),
        method.as_str(),
        elapsed_ms
    );

    Ok(png_response(bytes))
}

/// POST /v1/swap - JSON variant with base64-encoded images
///
/// Same pipeline as `/swap`, but takes base64 input and returns the result
/// as a base64 PNG together with method and timing metadata.
pub async fn swap_json_handler(
    State(state): State<AppState>,
    Json(request): Json<SwapRequest>,
) -> Result<Json<SwapResponse>, ApiError> {
    request.validate()?;

    let target_b64 = request.target.as_deref().unwrap_or_default();
    let (target, target_info) = decode_base64_image(target_b64).map_err(|e| {
        warn!("Failed to decode target image: {}", e);
        ApiError::InvalidRequest(format!("invalid target image: {}", e))
    })?;
    debug!(
        "JSON swap target: {}x{}, {} bytes",
        target_info.width, target_info.height, target_info.size_bytes
    );

    let source = match request.source.as_deref() {
        Some(b64) if !b64.is_empty() => {
            let (img, _) = decode_base64_image(b64).map_err(|e| {
                warn!("Failed to decode source image: {}", e);
                ApiError::InvalidRequest(format!("invalid source image: {}", e))
            })?;
            img
        }
        _ => fixed_source(&state)?,
    };

    let (image, method, elapsed_ms) = run_swap(&state, &source, &target)?;
    let encoded = crate::vision::image_utils::encode_png_base64(&image)
        .map_err(|e| ApiError::InternalError(format!("failed to encode output: {}", e)))?;

    info!(
        "Swap complete: {}x{} via {}, {}ms",
        image.width(),
        image.height(),
        method.as_str(),
        elapsed_ms
    );

    Ok(Json(SwapResponse::new(
        encoded,
        method.as_str(),
        image.width(),
        image.height(),
        elapsed_ms,
    )))
}

/// Resolve the fixed source image, revalidating the disk cache
fn fixed_source(state: &AppState) -> Result<DynamicImage, ApiError> {
    state
        .source_cache
        .load()
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            warn!("No fixed source image available and none uploaded");
            ApiError::ServiceUnavailable(
                "fixed source image not found in static/ (expected source.png or source.jpg); \
                 upload a source file or place an image there"
                    .to_string(),
            )
        })
}

fn run_swap(
    state: &AppState,
    source: &DynamicImage,
    target: &DynamicImage,
) -> Result<(image::RgbImage, SwapMethod, u64), ApiError> {
    let started = Instant::now();
    let outcome = state.swapper.swap(source, target).map_err(|e| {
        warn!("Face swap failed: {}", e);
        ApiError::from(e)
    })?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    Ok((outcome.image, outcome.method, elapsed_ms))
}
