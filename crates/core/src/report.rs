//! Bug report model and normalization.
//!
//! Inbound reports arrive either as JSON or as multipart form fields. Both
//! encodings are collected into a [`RawReport`] first, then normalized into a
//! strongly typed [`BugReport`] by [`BugReport::from_raw`]. Everything after
//! that point (body composition, label derivation, issue submission) works
//! on the normalized value only.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::{body, labels};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Title used when the client sends no title or a blank one.
pub const DEFAULT_TITLE: &str = "Unity Bug Report";

/// Maximum title length accepted by the issue tracker (characters).
pub const MAX_TITLE_LENGTH: usize = 256;

/// Maximum description length (characters). Keeps the composed body below
/// the tracker's 65 536 character limit.
pub const MAX_DESCRIPTION_LENGTH: usize = 60_000;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Labels as sent by the client: a single comma-separated string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LabelInput {
    One(String),
    Many(Vec<String>),
}

impl LabelInput {
    /// Flatten into individual trimmed, non-empty labels.
    pub fn into_labels(self) -> Vec<String> {
        let raw = match self {
            LabelInput::One(s) => s.split(',').map(str::to_string).collect(),
            LabelInput::Many(v) => v,
        };
        raw.into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Report fields exactly as received, before defaults are applied.
///
/// Field names are camelCase on the wire; snake_case aliases are accepted
/// for older clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Option<LabelInput>,
    #[serde(alias = "issue_type")]
    pub issue_type: Option<String>,
    #[serde(alias = "screenshot_url")]
    pub screenshot_url: Option<String>,
    #[serde(alias = "system_info")]
    pub system_info: Option<String>,
    #[serde(alias = "user_token")]
    pub user_token: Option<String>,
    /// URL of a vessel file uploaded earlier through `/upload-vessel`.
    #[serde(alias = "vessel_url")]
    pub vessel_url: Option<String>,
}

impl RawReport {
    /// Assign a multipart text field by name.
    ///
    /// Returns `Ok(false)` for unknown field names so the caller can ignore
    /// them. Repeated `labels` fields accumulate. A `labels` value starting
    /// with `[` must be a JSON array of strings.
    pub fn set_field(&mut self, name: &str, value: String) -> Result<bool, CoreError> {
        match name {
            "title" => self.title = Some(value),
            "description" => self.description = Some(value),
            "labels" | "labels[]" => self.push_labels(value)?,
            "issueType" | "issue_type" => self.issue_type = Some(value),
            "screenshotUrl" | "screenshot_url" => self.screenshot_url = Some(value),
            "systemInfo" | "system_info" => self.system_info = Some(value),
            "userToken" | "user_token" => self.user_token = Some(value),
            "vesselUrl" | "vessel_url" => self.vessel_url = Some(value),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn push_labels(&mut self, value: String) -> Result<(), CoreError> {
        let incoming = if value.trim_start().starts_with('[') {
            let list: Vec<String> = serde_json::from_str(value.trim()).map_err(|e| {
                CoreError::Validation(format!("labels must be a JSON array of strings: {e}"))
            })?;
            LabelInput::Many(list)
        } else {
            LabelInput::One(value)
        };

        let mut labels = self
            .labels
            .take()
            .map(LabelInput::into_labels)
            .unwrap_or_default();
        labels.extend(incoming.into_labels());
        self.labels = Some(LabelInput::Many(labels));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Normalized types
// ---------------------------------------------------------------------------

/// A vessel file attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VesselRef {
    pub filename: String,
    pub url: String,
}

impl VesselRef {
    /// Build a reference from a bare URL, taking the last path segment as
    /// the display filename.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let filename = path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("vessel")
            .to_string();
        Self {
            filename,
            url: url.to_string(),
        }
    }
}

/// Report-level validation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPolicy {
    /// Reject reports without a description.
    pub require_description: bool,
}

/// A validated bug report with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugReport {
    pub title: String,
    pub description: Option<String>,
    /// Explicit labels, already flattened. Empty when the client sent none.
    pub labels: Vec<String>,
    pub issue_type: Option<String>,
    pub screenshot_url: Option<String>,
    pub system_info: Option<String>,
    pub user_token: Option<String>,
    pub vessel: Option<VesselRef>,
}

/// The title, body and labels handed to the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl BugReport {
    /// Normalize a raw report.
    pub fn from_raw(raw: RawReport, policy: ReportPolicy) -> Result<Self, CoreError> {
        let title = non_blank(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        validate_title(&title)?;

        let description = non_blank(raw.description);
        match &description {
            Some(desc) => validate_description(desc)?,
            None if policy.require_description => {
                return Err(CoreError::Validation("Description is required".into()));
            }
            None => {}
        }

        Ok(Self {
            title,
            description,
            labels: raw.labels.map(LabelInput::into_labels).unwrap_or_default(),
            issue_type: non_blank(raw.issue_type),
            screenshot_url: non_blank(raw.screenshot_url),
            system_info: non_blank(raw.system_info),
            user_token: non_blank(raw.user_token),
            vessel: non_blank(raw.vessel_url).map(|url| VesselRef::from_url(&url)),
        })
    }

    /// Attach a vessel uploaded in the same request. It replaces any
    /// `vesselUrl` reference.
    pub fn with_vessel(mut self, vessel: VesselRef) -> Self {
        self.vessel = Some(vessel);
        self
    }

    /// Compose the issue submitted to the tracker.
    pub fn to_draft(&self) -> IssueDraft {
        IssueDraft {
            title: self.title.clone(),
            body: body::compose_body(self),
            labels: labels::derive_labels(self),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate the title length.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate the description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
