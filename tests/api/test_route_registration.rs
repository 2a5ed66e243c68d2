// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! Verify every documented route is mounted and responds with the right
//! status class, without exercising the pipelines themselves.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use faceswap_node::api::{create_router, AppState};
use tower::ServiceExt;

async fn get(uri: &str) -> StatusCode {
    let app = create_router(AppState::new_for_test());
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_health_route() {
    assert_eq!(get("/health").await, StatusCode::OK);
}

#[tokio::test]
async fn test_fact_route() {
    assert_eq!(get("/fact").await, StatusCode::OK);
}

#[tokio::test]
async fn test_debug_source_route() {
    assert_eq!(get("/debug-source").await, StatusCode::OK);
}

#[tokio::test]
async fn test_index_served_from_static_dir() {
    // new_for_test points at ./static, which ships with the repo
    assert_eq!(get("/").await, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    assert_eq!(get("/no-such-route").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_swap_rejects_non_multipart() {
    let app = create_router(AppState::new_for_test());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/swap")
                .header("content-type", "text/plain")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_v1_swap_requires_target() {
    let app = create_router(AppState::new_for_test());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/swap")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_body_reports_availability() {
    let app = create_router(AppState::new_for_test());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["swapAvailable"], false);
}
