// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration from environment variables

use std::env;
use std::path::PathBuf;

/// Default maximum upload size (10MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration for the faceswap node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the frontend and the fixed source image
    pub static_dir: PathBuf,
    /// Path to the face-mesh ONNX model
    pub mesh_model_path: PathBuf,
    /// Path to the SeetaFace frontal detection model
    pub face_detect_model_path: PathBuf,
    /// Maximum accepted upload size in bytes
    pub max_image_bytes: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("./static"),
            mesh_model_path: PathBuf::from("./models/face_mesh.onnx"),
            face_detect_model_path: PathBuf::from("./models/seeta_fd_frontal_v1.0.bin"),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl NodeConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);
        let mesh_model_path = env::var("MESH_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.mesh_model_path);
        let face_detect_model_path = env::var("FACE_DETECT_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.face_detect_model_path);
        let max_image_bytes = env::var("MAX_IMAGE_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.max_image_bytes);

        Self {
            host,
            port,
            static_dir,
            mesh_model_path,
            face_detect_model_path,
            max_image_bytes,
        }
    }

    /// Listen address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
