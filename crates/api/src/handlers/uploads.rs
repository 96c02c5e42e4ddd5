//! Multipart file uploads for budget photos and invoices.
//!
//! Files land in the configured upload directory under a random name and are
//! served back via the static `/files` mount. The returned URL is what the
//! client embeds in budget photo and invoice payloads.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    /// Path under which the file is served, e.g. `/files/<uuid>.png`.
    pub url: String,
    /// The client's original file name, for display.
    pub file_name: String,
}

/// POST /uploads
pub async fn upload(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Vec<UploadedFile>>>> {
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Could not create upload directory: {e}")))?;

    let mut uploaded = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart payload: {e}")))?
    {
        let file_name = field.file_name().unwrap_or("file").to_string();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        if data.is_empty() {
            continue;
        }

        let stored_name = format!("{}{extension}", Uuid::new_v4());
        let path = Path::new(&state.config.upload_dir).join(&stored_name);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::InternalError(format!("Could not store upload: {e}")))?;

        tracing::debug!(%file_name, %stored_name, bytes = data.len(), "File uploaded");

        uploaded.push(UploadedFile {
            url: format!("/files/{stored_name}"),
            file_name,
        });
    }

    if uploaded.is_empty() {
        return Err(AppError::BadRequest("No files in upload".into()));
    }

    Ok(Json(DataResponse { data: uploaded }))
}
