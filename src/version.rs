// Version information for the Faceswap Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-landmark-swap-2026-08-06";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-08-06";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "landmark-swap",
    "bounding-box-fallback",
    "fixed-source-hot-reload",
    "multipart-upload",
    "json-base64-api",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Faceswap Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
