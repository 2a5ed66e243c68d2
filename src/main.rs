// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use faceswap_node::{api, config::NodeConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Faceswap Node...");
    println!("📦 BUILD VERSION: {}", faceswap_node::version::VERSION);
    println!();

    let config = NodeConfig::from_env();
    tracing::info!(
        "Config: listen {}, static dir {}, mesh model {}, detect model {}",
        config.listen_addr(),
        config.static_dir.display(),
        config.mesh_model_path.display(),
        config.face_detect_model_path.display()
    );

    // Model loading degrades gracefully: a missing file disables that swap
    // path and the server still comes up.
    let state = api::AppState::new(config);
    if !state.swapper.is_available() {
        tracing::warn!(
            "⚠️ No face models loaded - /swap will return 503 until model files are provided"
        );
    }

    // Warm the fixed source cache so a bad file is reported at startup
    if state.source_cache.load().is_none() {
        tracing::warn!(
            "⚠️ No fixed source image found; clients must upload a source with each request"
        );
    }

    api::start_server(state).await
}
