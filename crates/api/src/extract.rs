//! Request body extraction for report and upload routes.
//!
//! Report routes accept JSON, `multipart/form-data` and URL-encoded forms.
//! [`ReportSubmission`] inspects the content type and normalizes all three
//! into one [`RawReport`] plus an optional file, so handlers never see the
//! encoding.

use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use bugrelay_core::error::CoreError;
use bugrelay_core::report::RawReport;
use bugrelay_core::upload::{UploadPolicy, UPLOAD_FIELD};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file part read into memory.
#[derive(Debug)]
pub struct FilePart {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Text fields and the optional file of a multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub report: RawReport,
    pub file: Option<FilePart>,
}

/// A report body in any supported encoding.
#[derive(Debug)]
pub struct ReportSubmission {
    pub report: RawReport,
    pub file: Option<FilePart>,
}

impl FromRequest<AppState> for ReportSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        if is_json(&content_type) {
            let Json(report) = Json::<RawReport>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self { report, file: None })
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let form = read_multipart(multipart, state.uploads.policy()).await?;
            Ok(Self {
                report: form.report,
                file: form.file,
            })
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let mut report = RawReport::default();
            for (name, value) in pairs {
                if !report.set_field(&name, value)? {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
            Ok(Self { report, file: None })
        } else {
            Err(AppError::UnsupportedMediaType(
                "Expected application/json, multipart/form-data or application/x-www-form-urlencoded"
                    .into(),
            ))
        }
    }
}

/// `application/json` or any `application/*+json` type.
fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Read every field of a multipart body.
///
/// Text fields go into the report, the `vessel` field is read as a file
/// (extension checked first, size checked while streaming). A second file
/// is rejected. A `vessel` field without a filename, as browsers send for an
/// empty file input, counts as no file.
pub async fn read_multipart(
    mut multipart: Multipart,
    policy: &UploadPolicy,
) -> AppResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == UPLOAD_FIELD {
            let filename = field.file_name().unwrap_or("").trim().to_string();
            if filename.is_empty() {
                continue;
            }
            if form.file.is_some() {
                return Err(AppError::BadRequest(
                    "Only one vessel file may be uploaded per request".into(),
                ));
            }
            form.file = Some(read_file_field(field, filename, policy).await?);
        } else {
            let text = field.text().await?;
            if !form.report.set_field(&name, text)? {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

async fn read_file_field(
    mut field: Field<'_>,
    filename: String,
    policy: &UploadPolicy,
) -> AppResult<FilePart> {
    policy.validate_extension(&filename)?;

    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if data.len() + chunk.len() > policy.max_bytes() {
            return Err(CoreError::PayloadTooLarge {
                limit: policy.max_bytes(),
            }
            .into());
        }
        data.extend_from_slice(&chunk);
    }

    Ok(FilePart { filename, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_types() {
        assert!(is_json("application/json"));
        assert!(is_json("application/json; charset=utf-8"));
        assert!(is_json("application/vnd.bugrelay.report+json"));
        assert!(!is_json("text/json"));
        assert!(!is_json("application/jsonx"));
        assert!(!is_json(""));
    }
}
