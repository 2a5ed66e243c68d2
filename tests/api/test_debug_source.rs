// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for GET /debug-source

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use faceswap_node::api::{create_router, AppState};
use faceswap_node::config::NodeConfig;
use faceswap_node::vision::{FaceSwapper, SourceCache};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

// 1x1 red PNG - minimal valid image
const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

fn setup_state(static_dir: &TempDir) -> AppState {
    AppState {
        swapper: Arc::new(FaceSwapper::with_models(None, None)),
        source_cache: Arc::new(SourceCache::new(static_dir.path())),
        config: NodeConfig::default(),
    }
}

async fn get_status(state: AppState) -> serde_json::Value {
    let app = create_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/debug-source")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_debug_source_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    let json = get_status(setup_state(&dir)).await;

    assert_eq!(json["filePng"], false);
    assert_eq!(json["fileJpg"], false);
    assert_eq!(json["loaded"], false);
    assert!(json.get("width").is_none());
}

#[tokio::test]
async fn test_debug_source_with_png() {
    let dir = tempfile::tempdir().unwrap();
    let png = STANDARD.decode(TINY_PNG_BASE64).unwrap();
    std::fs::write(dir.path().join("source.png"), png).unwrap();

    let json = get_status(setup_state(&dir)).await;

    assert_eq!(json["filePng"], true);
    assert_eq!(json["loaded"], true);
    assert_eq!(json["loadedExt"], "png");
    assert_eq!(json["width"], 1);
    assert_eq!(json["height"], 1);
}

#[tokio::test]
async fn test_debug_source_undecodable_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("source.png"), b"junk").unwrap();

    let json = get_status(setup_state(&dir)).await;

    assert_eq!(json["filePng"], true);
    assert_eq!(json["loaded"], false);
}
