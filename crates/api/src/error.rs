use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bugrelay_core::error::CoreError;
use bugrelay_tracker::TrackerError;
use serde_json::json;

/// Message returned for every tracker failure. Upstream details stay in logs.
pub const TRACKER_FAILURE_MESSAGE: &str = "Failed to create issue";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`TrackerError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{ "error", "code" }`
/// JSON bodies. This is the only place errors become HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bugrelay_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The issue tracker call failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded a size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The request body encoding is not supported.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::UnsupportedExtension { extension, allowed } => (
                    StatusCode::BAD_REQUEST,
                    "UNSUPPORTED_EXTENSION",
                    unsupported_extension_message(extension, allowed),
                ),
                CoreError::PayloadTooLarge { limit } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    format!("File exceeds the maximum upload size of {limit} bytes"),
                ),
            },

            // --- Tracker errors ---
            AppError::Tracker(err) => {
                // Already logged at error level by the tracker client.
                tracing::debug!(error = %err, "Issue tracker error");
                (
                    tracker_status(err),
                    "TRACKER_ERROR",
                    TRACKER_FAILURE_MESSAGE.to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a tracker failure to the status returned to the client: the upstream
/// 4xx/5xx status when there is one, 500 otherwise.
fn tracker_status(err: &TrackerError) -> StatusCode {
    StatusCode::from_u16(err.status_code())
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn unsupported_extension_message(extension: &str, allowed: &[String]) -> String {
    let allowed = allowed
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ");
    if extension.is_empty() {
        format!("File has no extension. Allowed extensions: {allowed}")
    } else {
        format!("File extension '.{extension}' is not allowed. Allowed extensions: {allowed}")
    }
}
