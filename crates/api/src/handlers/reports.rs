//! Handlers for bug report submission.
//!
//! Pipeline per request: extract → normalize → store optional vessel file →
//! compose issue → submit to tracker → respond. Nothing is retried; the first
//! failure ends the request.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bugrelay_core::report::{BugReport, VesselRef};
use bugrelay_core::upload::sanitize_filename;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::ReportSubmission;
use crate::public_url;
use crate::state::AppState;

/// Response for a successfully created issue.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub issue_url: String,
    pub issue_number: u64,
    /// The vessel file linked from the issue, if any.
    pub attachment: Option<VesselRef>,
}

// ---------------------------------------------------------------------------
// POST /report, POST /submit-bug
// ---------------------------------------------------------------------------

/// Turn a bug report into a tracker issue.
///
/// Accepts JSON, multipart (with optional `vessel` file) or URL-encoded
/// bodies. Both routes share this handler.
pub async fn submit_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    submission: ReportSubmission,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    let ReportSubmission { report, file } = submission;

    let mut report = BugReport::from_raw(report, state.config.report_policy)?;

    if let Some(file) = file {
        let stored = state.uploads.store(&file.filename, &file.data).await?;
        let base = public_url::base_url(&headers, state.config.public_base_url.as_deref());
        report = report.with_vessel(VesselRef {
            url: public_url::upload_url(&base, &stored.stored_filename),
            filename: sanitize_filename(&stored.original_filename),
        });
    }

    let draft = report.to_draft();

    tracing::info!(
        title = %draft.title,
        labels = ?draft.labels,
        has_vessel = report.vessel.is_some(),
        "Bug report received",
    );

    let issue = state.tracker.create_issue(&draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            success: true,
            issue_url: issue.html_url,
            issue_number: issue.number,
            attachment: report.vessel,
        }),
    ))
}
