//! Route definitions for bug report submission.

use axum::routing::post;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report routes.
///
/// ```text
/// POST   /report        -> submit_report
/// POST   /submit-bug    -> submit_report (legacy clients)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/report", post(reports::submit_report))
        .route("/submit-bug", post(reports::submit_report))
}
