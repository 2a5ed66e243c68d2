// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Swap endpoint tests for POST /swap and POST /v1/swap
//!
//! These tests verify that the swap handlers correctly:
//! - Validate requests and return appropriate errors
//! - Fall back to the fixed source image when no source is uploaded
//! - Report service unavailability when no models are loaded
//!
//! Tests that need real model files are marked #[ignore].

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::Json;
use faceswap_node::api::swap::{swap_json_handler, SwapRequest};
use faceswap_node::api::{create_router, AppState};
use faceswap_node::config::NodeConfig;
use faceswap_node::vision::{FaceSwapper, SourceCache, SwapEngineConfig};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// 1x1 red PNG - minimal valid image
const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

/// Helper: state with no models and an empty static dir (no fixed source)
fn setup_state_without_models() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState {
        swapper: Arc::new(FaceSwapper::with_models(None, None)),
        source_cache: Arc::new(SourceCache::new(dir.path())),
        config: NodeConfig::default(),
    };
    (state, dir)
}

/// Helper: state with no models but a decodable fixed source on disk
fn setup_state_with_fixed_source() -> (AppState, TempDir) {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let dir = tempfile::tempdir().expect("tempdir");
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();
    std::fs::write(dir.path().join("source.png"), png).unwrap();

    let state = AppState {
        swapper: Arc::new(FaceSwapper::with_models(None, None)),
        source_cache: Arc::new(SourceCache::new(dir.path())),
        config: NodeConfig::default(),
    };
    (state, dir)
}

/// Helper: state that loads real models from ./models (integration only)
fn setup_state_with_models() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let swapper = FaceSwapper::new(SwapEngineConfig {
        mesh_model_path: Some("./models/face_mesh.onnx".into()),
        face_detect_model_path: Some("./models/seeta_fd_frontal_v1.0.bin".into()),
    });
    let state = AppState {
        swapper: Arc::new(swapper),
        source_cache: Arc::new(SourceCache::new(dir.path())),
        config: NodeConfig::default(),
    };
    (state, dir)
}

mod json_handler_tests {
    use super::*;

    /// Test 1: Validation error when target is missing
    #[tokio::test]
    async fn test_validation_error_missing_target() {
        let (state, _dir) = setup_state_without_models();

        let request = SwapRequest {
            target: None,
            source: None,
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        let err = result.expect_err("should fail without target");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_response().error.contains("target"));
    }

    /// Test 2: Bad request for invalid base64 target
    #[tokio::test]
    async fn test_invalid_base64_target() {
        let (state, _dir) = setup_state_without_models();

        let request = SwapRequest {
            target: Some("not-valid-base64!!!".to_string()),
            source: None,
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        let err = result.expect_err("should fail with invalid base64");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    /// Test 3: Bad request when target is valid base64 but not an image
    #[tokio::test]
    async fn test_target_not_an_image() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let (state, _dir) = setup_state_without_models();

        let request = SwapRequest {
            target: Some(STANDARD.encode([0x00, 0x01, 0x02, 0x03, 0x04, 0x05])),
            source: None,
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        let err = result.expect_err("should fail when target is not an image");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    /// Test 4: 503 when no source is uploaded and no fixed source exists
    #[tokio::test]
    async fn test_missing_fixed_source() {
        let (state, _dir) = setup_state_without_models();

        let request = SwapRequest {
            target: Some(TINY_PNG_BASE64.to_string()),
            source: None,
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        let err = result.expect_err("should fail without any source");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_response().error.contains("source"));
    }

    /// Test 5: 503 when a source resolves but no models are loaded
    #[tokio::test]
    async fn test_no_models_loaded() {
        let (state, _dir) = setup_state_without_models();

        let request = SwapRequest {
            target: Some(TINY_PNG_BASE64.to_string()),
            source: Some(TINY_PNG_BASE64.to_string()),
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        let err = result.expect_err("should fail without models");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    /// Test 6: The fixed source is picked up from disk before the engine runs
    #[tokio::test]
    async fn test_fixed_source_resolves() {
        let (state, _dir) = setup_state_with_fixed_source();

        let request = SwapRequest {
            target: Some(TINY_PNG_BASE64.to_string()),
            source: None,
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        // The fixed source decoded fine, so the failure is the missing
        // engine (503 "no face processing engine"), not a missing source.
        let err = result.expect_err("should fail at the engine, not the source");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_response().error.contains("engine"));
    }

    /// Test 7: Full swap with real models produces a PNG and metadata
    #[tokio::test]
    #[ignore] // Requires model files
    async fn test_swap_with_models() {
        let (state, _dir) = setup_state_with_models();

        let request = SwapRequest {
            target: Some(TINY_PNG_BASE64.to_string()),
            source: Some(TINY_PNG_BASE64.to_string()),
        };
        let result = swap_json_handler(State(state), Json(request)).await;

        // A 1x1 image has no face; both paths must fail with a clean 500
        // rather than panic.
        if let Err(err) = result {
            assert!(
                err.status_code() == StatusCode::INTERNAL_SERVER_ERROR
                    || err.status_code() == StatusCode::SERVICE_UNAVAILABLE
            );
        }
    }
}

mod multipart_route_tests {
    use super::*;

    const BOUNDARY: &str = "XtestBoundaryX";

    fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for (name, filename, bytes) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                        name, f
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                ),
            }
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/swap")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Test 8: /swap without a target part is a 400 naming the field
    #[tokio::test]
    async fn test_swap_missing_target_part() {
        let (state, _dir) = setup_state_without_models();
        let app = create_router(state);

        let request = multipart_request(&[("other", None, b"hello")]);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("target"));
    }

    /// Test 9: /swap with an undecodable target is a 400 JSON error
    #[tokio::test]
    async fn test_swap_undecodable_target() {
        let (state, _dir) = setup_state_without_models();
        let app = create_router(state);

        let request =
            multipart_request(&[("target", Some("t.png"), b"definitely not an image")]);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("could not decode target image"));
    }

    /// Test 10: a source part without a filename counts as "no source"
    #[tokio::test]
    async fn test_swap_empty_source_part_ignored() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let (state, _dir) = setup_state_without_models();
        let app = create_router(state);

        let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();
        let request = multipart_request(&[
            ("target", Some("t.png"), &png),
            ("source", None, b""),
        ]);
        let response = app.oneshot(request).await.unwrap();

        // No usable source part and no fixed source on disk -> 503
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("source"));
    }
}
