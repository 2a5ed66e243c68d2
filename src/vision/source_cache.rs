// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed source image cache
//!
//! The service can run with a fixed source face kept on disk as
//! `source.png` / `source.jpg` / `source.jpeg` in the static directory.
//! The decoded image is cached keyed by path and mtime and revalidated on
//! every request, so replacing the file takes effect without a restart.

use image::RgbImage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;
use tracing::{info, warn};

use crate::vision::image_utils::decode_image_bytes;

/// Extensions probed for the fixed source, in priority order
pub const SOURCE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

struct CachedSource {
    path: PathBuf,
    mtime: SystemTime,
    image: RgbImage,
}

/// Diagnostic snapshot for the /debug-source endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    pub file_png: bool,
    pub file_jpg: bool,
    pub file_jpeg: bool,
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_ext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Cache for the fixed source face image
pub struct SourceCache {
    static_dir: PathBuf,
    state: RwLock<Option<CachedSource>>,
}

impl SourceCache {
    pub fn new<P: AsRef<Path>>(static_dir: P) -> Self {
        Self {
            static_dir: static_dir.as_ref().to_path_buf(),
            state: RwLock::new(None),
        }
    }

    /// Get the fixed source image, reloading when the file changed on disk
    pub fn load(&self) -> Option<RgbImage> {
        self.load_inner(false)
    }

    /// Reload from disk regardless of the cached mtime
    pub fn force_reload(&self) -> Option<RgbImage> {
        self.load_inner(true)
    }

    fn load_inner(&self, force: bool) -> Option<RgbImage> {
        for ext in SOURCE_EXTENSIONS {
            let path = self.static_dir.join(format!("source.{}", ext));
            let Ok(meta) = fs::metadata(&path) else {
                continue;
            };
            let Ok(mtime) = meta.modified() else {
                continue;
            };

            if !force {
                let guard = self.state.read().unwrap();
                if let Some(cached) = guard.as_ref() {
                    if cached.path == path && cached.mtime == mtime {
                        return Some(cached.image.clone());
                    }
                }
            }

            let decoded = fs::read(&path)
                .ok()
                .and_then(|bytes| decode_image_bytes(&bytes).ok());

            match decoded {
                Some((img, _info)) => {
                    let rgb = img.to_rgb8();
                    info!("Loaded fixed source image: {}", path.display());
                    *self.state.write().unwrap() = Some(CachedSource {
                        path,
                        mtime,
                        image: rgb.clone(),
                    });
                    return Some(rgb);
                }
                None => {
                    warn!("Could not decode fixed source candidate {}", path.display());
                    continue;
                }
            }
        }

        warn!(
            "Fixed source image not found in {} (expected source.png or source.jpg)",
            self.static_dir.display()
        );
        *self.state.write().unwrap() = None;
        None
    }

    /// Diagnostic info about the fixed source files and load state
    pub fn status(&self) -> SourceStatus {
        let exists =
            |ext: &str| -> bool { self.static_dir.join(format!("source.{}", ext)).exists() };

        let loaded_image = self.load();
        let loaded_ext = self.state.read().unwrap().as_ref().and_then(|c| {
            c.path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
        });

        SourceStatus {
            file_png: exists("png"),
            file_jpg: exists("jpg"),
            file_jpeg: exists("jpeg"),
            loaded: loaded_image.is_some(),
            loaded_ext,
            width: loaded_image.as_ref().map(|i| i.width()),
            height: loaded_image.as_ref().map(|i| i.height()),
        }
    }
}
