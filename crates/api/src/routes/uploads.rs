//! Route definitions for vessel uploads.

use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Upload routes.
///
/// ```text
/// POST   /upload-vessel -> upload_vessel
/// POST   /upload        -> upload_vessel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-vessel", post(uploads::upload_vessel))
        .route("/upload", post(uploads::upload_vessel))
}
