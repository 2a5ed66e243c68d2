use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::facts::fact_handler;
use crate::api::swap::{swap_handler, swap_json_handler};
use crate::config::NodeConfig;
use crate::vision::{FaceSwapper, SourceCache, SourceStatus, SwapEngineConfig};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub swapper: Arc<FaceSwapper>,
    pub source_cache: Arc<SourceCache>,
    pub config: NodeConfig,
}

impl AppState {
    /// Build state from config, loading whichever models are present
    pub fn new(config: NodeConfig) -> Self {
        let swapper = FaceSwapper::new(SwapEngineConfig {
            mesh_model_path: Some(config.mesh_model_path.clone()),
            face_detect_model_path: Some(config.face_detect_model_path.clone()),
        });
        let source_cache = SourceCache::new(&config.static_dir);

        Self {
            swapper: Arc::new(swapper),
            source_cache: Arc::new(source_cache),
            config,
        }
    }

    /// State with no models loaded, for handler tests
    pub fn new_for_test() -> Self {
        let config = NodeConfig::default();
        Self {
            swapper: Arc::new(FaceSwapper::with_models(None, None)),
            source_cache: Arc::new(SourceCache::new(&config.static_dir)),
            config,
        }
    }
}

/// Response for GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mesh_loaded: bool,
    pub detector_loaded: bool,
    pub swap_available: bool,
}

pub fn create_router(state: AppState) -> Router {
    // Multipart bodies can carry both a source and a target image
    let body_limit = state.config.max_image_bytes * 2 + 64 * 1024;
    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Face swap endpoints
        .route("/swap", post(swap_handler))
        .route("/v1/swap", post(swap_json_handler))
        // Fun fact endpoint
        .route("/fact", get(fact_handler))
        // Fixed source diagnostics
        .route("/debug-source", get(debug_source_handler))
        // Frontend and the fixed source image
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.listen_addr();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
        mesh_loaded: state.swapper.has_mesh(),
        detector_loaded: state.swapper.has_detector(),
        swap_available: state.swapper.is_available(),
    })
}

/// GET /debug-source - Diagnostic info about the fixed source image
async fn debug_source_handler(State(state): State<AppState>) -> Json<SourceStatus> {
    Json(state.source_cache.status())
}
