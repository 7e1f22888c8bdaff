//! Label derivation for submitted issues.
//!
//! Base labels come from the first source present:
//!
//! 1. explicit `labels` sent by the client
//! 2. the `issueType` field, slugified
//! 3. [`DEFAULT_LABEL`]
//!
//! Derived labels are then appended: the game version found in the system
//! info, [`LABEL_HAS_SCREENSHOT`] and [`LABEL_HAS_VESSEL`]. Order is
//! preserved and duplicates are dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::report::BugReport;

/// Label used when neither labels nor an issue type were supplied.
pub const DEFAULT_LABEL: &str = "bug";
/// Appended when the report carries a screenshot URL.
pub const LABEL_HAS_SCREENSHOT: &str = "has-screenshot";
/// Appended when the report carries a vessel file.
pub const LABEL_HAS_VESSEL: &str = "has-vessel";

static GAME_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)game\s+version:\s*(\d+(?:\.\d+)*)").expect("valid regex")
});

/// Extract the version number from a `Game Version: X.Y.Z` line.
pub fn extract_game_version(system_info: &str) -> Option<&str> {
    GAME_VERSION_RE
        .captures(system_info)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Turn a free-form issue type into a label (`"Visual Glitch"` -> `"visual-glitch"`).
pub fn issue_type_label(issue_type: &str) -> Option<String> {
    let slug = issue_type
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    (!slug.is_empty()).then_some(slug)
}

/// Compute the full label set for a report.
pub fn derive_labels(report: &BugReport) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    if !report.labels.is_empty() {
        labels.extend(report.labels.iter().cloned());
    } else if let Some(label) = report.issue_type.as_deref().and_then(issue_type_label) {
        labels.push(label);
    } else {
        labels.push(DEFAULT_LABEL.to_string());
    }

    if let Some(version) = report.system_info.as_deref().and_then(extract_game_version) {
        labels.push(format!("v{version}"));
    }
    if report.screenshot_url.is_some() {
        labels.push(LABEL_HAS_SCREENSHOT.to_string());
    }
    if report.vessel.is_some() {
        labels.push(LABEL_HAS_VESSEL.to_string());
    }

    dedup_preserving_order(labels)
}

fn dedup_preserving_order(labels: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::VesselRef;

    fn report() -> BugReport {
        BugReport {
            title: "t".into(),
            description: None,
            labels: Vec::new(),
            issue_type: None,
            screenshot_url: None,
            system_info: None,
            user_token: None,
            vessel: None,
        }
    }

    #[test]
    fn default_label_when_nothing_given() {
        assert_eq!(derive_labels(&report()), vec![DEFAULT_LABEL]);
    }

    #[test]
    fn issue_type_becomes_label() {
        let r = BugReport {
            issue_type: Some("Visual  Glitch".into()),
            ..report()
        };
        assert_eq!(derive_labels(&r), vec!["visual-glitch"]);
    }

    #[test]
    fn explicit_labels_take_precedence_over_issue_type() {
        let r = BugReport {
            labels: vec!["crash".into(), "ui".into()],
            issue_type: Some("feature".into()),
            ..report()
        };
        assert_eq!(derive_labels(&r), vec!["crash", "ui"]);
    }

    #[test]
    fn game_version_adds_version_label() {
        let r = BugReport {
            system_info: Some("OS: Windows 11\nGame Version: 2.3.1\nGPU: RTX".into()),
            ..report()
        };
        assert!(derive_labels(&r).contains(&"v2.3.1".to_string()));
    }

    #[test]
    fn game_version_match_is_case_insensitive() {
        assert_eq!(extract_game_version("game version:1.12"), Some("1.12"));
        assert_eq!(extract_game_version("Unity Version: 2022.3"), None);
    }

    #[test]
    fn screenshot_without_vessel() {
        let r = BugReport {
            screenshot_url: Some("https://img.example/s.png".into()),
            ..report()
        };
        let labels = derive_labels(&r);
        assert!(labels.contains(&LABEL_HAS_SCREENSHOT.to_string()));
        assert!(!labels.contains(&LABEL_HAS_VESSEL.to_string()));
    }

    #[test]
    fn derived_labels_follow_base_labels_in_order() {
        let r = BugReport {
            issue_type: Some("crash".into()),
            system_info: Some("Game Version: 0.9".into()),
            screenshot_url: Some("https://img.example/s.png".into()),
            vessel: Some(VesselRef {
                filename: "a.craft".into(),
                url: "http://h/uploads/a.craft".into(),
            }),
            ..report()
        };
        assert_eq!(
            derive_labels(&r),
            vec!["crash", "v0.9", LABEL_HAS_SCREENSHOT, LABEL_HAS_VESSEL]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let r = BugReport {
            labels: vec!["bug".into(), "has-vessel".into(), "bug".into()],
            vessel: Some(VesselRef {
                filename: "a.craft".into(),
                url: "u".into(),
            }),
            ..report()
        };
        assert_eq!(derive_labels(&r), vec!["bug", "has-vessel"]);
    }
}
