// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Swap request types and validation

use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Multipart upload for POST /swap
///
/// `target` is required. A `source` part is only honored when it carries a
/// filename; browsers submit an empty unnamed part for an untouched file
/// input, which counts as "no source uploaded".
#[derive(Debug, Clone)]
pub struct SwapUpload {
    pub target: Vec<u8>,
    pub source: Option<Vec<u8>>,
}

impl SwapUpload {
    /// Read and validate the multipart form
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut target: Option<Vec<u8>> = None;
        let mut source: Option<Vec<u8>> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("malformed multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let has_filename = field
                .file_name()
                .map(|f| !f.is_empty())
                .unwrap_or(false);

            match name.as_str() {
                "target" => {
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::InvalidRequest(format!("failed to read target upload: {}", e))
                    })?;
                    target = Some(bytes.to_vec());
                }
                "source" if has_filename => {
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::InvalidRequest(format!("failed to read source upload: {}", e))
                    })?;
                    if !bytes.is_empty() {
                        source = Some(bytes.to_vec());
                    }
                }
                // Unknown fields and empty source parts are ignored
                _ => {}
            }
        }

        let upload = Self {
            target: target.ok_or_else(|| ApiError::ValidationError {
                field: "target".to_string(),
                message: "target file required".to_string(),
            })?,
            source,
        };
        upload.validate()?;
        Ok(upload)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.target.is_empty() {
            return Err(ApiError::ValidationError {
                field: "target".to_string(),
                message: "target file required".to_string(),
            });
        }
        if self.target.len() > MAX_IMAGE_SIZE {
            return Err(ApiError::ValidationError {
                field: "target".to_string(),
                message: format!("target exceeds maximum size of {} bytes", MAX_IMAGE_SIZE),
            });
        }
        if let Some(ref source) = self.source {
            if source.len() > MAX_IMAGE_SIZE {
                return Err(ApiError::ValidationError {
                    field: "source".to_string(),
                    message: format!("source exceeds maximum size of {} bytes", MAX_IMAGE_SIZE),
                });
            }
        }
        Ok(())
    }
}

/// JSON request for POST /v1/swap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    /// Base64-encoded target image (required)
    #[serde(default)]
    pub target: Option<String>,

    /// Base64-encoded source image; the fixed source is used when absent
    #[serde(default)]
    pub source: Option<String>,
}

impl SwapRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let target = self.target.as_deref().unwrap_or_default();
        if target.is_empty() {
            return Err(ApiError::ValidationError {
                field: "target".to_string(),
                message: "target is required".to_string(),
            });
        }
        if target.len() > MAX_IMAGE_SIZE {
            return Err(ApiError::ValidationError {
                field: "target".to_string(),
                message: format!("target exceeds maximum size of {} bytes", MAX_IMAGE_SIZE),
            });
        }
        if let Some(ref source) = self.source {
            if source.len() > MAX_IMAGE_SIZE {
                return Err(ApiError::ValidationError {
                    field: "source".to_string(),
                    message: format!("source exceeds maximum size of {} bytes", MAX_IMAGE_SIZE),
                });
            }
        }
        Ok(())
    }
}
