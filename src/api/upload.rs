//! Upload endpoints
//!
//! Handles the admin-only image upload:
//! - GET /uploader - upload form view model
//! - POST /uploader - accept one multipart `file` field
//!
//! The client-supplied filename is kept, but sanitized so it can never
//! escape the upload directory. A collision with an existing file
//! overwrites it.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::api::middleware::{AdminIdentity, ApiError, AppState};

/// View model for the upload form
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadFormView {
    pub max_file_size: u64,
    pub allowed_types: Vec<String>,
}

/// Response for a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
    pub size: u64,
}

/// GET /uploader - upload form limits
pub async fn upload_form(
    State(state): State<AppState>,
    _admin: AdminIdentity,
) -> Json<UploadFormView> {
    Json(UploadFormView {
        max_file_size: state.upload_config.max_file_size,
        allowed_types: state.upload_config.allowed_types.clone(),
    })
}

/// POST /uploader - store one uploaded file
///
/// Requires an authenticated admin.
/// Accepts multipart/form-data with a single file field named "file".
pub async fn upload_file(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let config = &state.upload_config;

    ensure_upload_dir(&config.path).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }

        let raw_filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_default();

        let filename = sanitize_filename(&raw_filename).ok_or_else(|| {
            ApiError::validation_error(format!("Unusable filename: '{}'", raw_filename))
        })?;

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(ApiError::validation_error(format!(
                "Invalid file type: {}. Allowed types: {:?}",
                content_type, config.allowed_types
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "File too large. Maximum size: {} bytes ({} MB)",
                config.max_file_size,
                config.max_file_size / 1024 / 1024
            )));
        }

        // Overwrites any earlier upload with the same sanitized name
        let file_path = config.path.join(&filename);
        fs::write(&file_path, &data)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to save file: {}", e)))?;

        tracing::info!("Stored upload {} ({} bytes)", filename, data.len());

        return Ok(Json(UploadResponse {
            url: format!("/uploads/{}", filename),
            filename,
            size: data.len() as u64,
        }));
    }

    Err(ApiError::validation_error("No file provided"))
}

/// Ensure upload directory exists
async fn ensure_upload_dir(path: &PathBuf) -> Result<(), ApiError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to create upload dir: {}", e)))?;
    }
    Ok(())
}

/// Sanitize a client-supplied filename.
///
/// Keeps only the last path component and strips every character
/// outside `[A-Za-z0-9._-]` plus any leading/trailing dots, so the
/// result can never traverse out of the upload directory. Returns
/// `None` when nothing usable remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
