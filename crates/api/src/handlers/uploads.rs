//! Handlers for standalone vessel file uploads.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::read_multipart;
use crate::public_url;
use crate::state::AppState;

/// Response for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    /// URL the file can be downloaded from.
    pub file_url: String,
    /// Stored (sanitized, prefixed) filename.
    pub filename: String,
    /// Size in bytes.
    pub size: usize,
}

// ---------------------------------------------------------------------------
// POST /upload-vessel
// ---------------------------------------------------------------------------

/// Store a single vessel file and return its URL.
///
/// The file must be sent as multipart field `vessel`. Other fields are
/// ignored.
pub async fn upload_vessel(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_multipart(multipart, state.uploads.policy()).await?;

    let file = form
        .file
        .ok_or_else(|| AppError::BadRequest("No vessel file uploaded".into()))?;

    let stored = state.uploads.store(&file.filename, &file.data).await?;

    let base = public_url::base_url(&headers, state.config.public_base_url.as_deref());
    let file_url = public_url::upload_url(&base, &stored.stored_filename);

    tracing::info!(
        stored_filename = %stored.stored_filename,
        size = stored.size,
        %file_url,
        "Vessel file uploaded",
    );

    Ok(Json(UploadResponse {
        success: true,
        file_url,
        filename: stored.stored_filename,
        size: stored.size,
    }))
}
