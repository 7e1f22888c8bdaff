//! Markdown issue body composition.
//!
//! Section order is fixed: description, screenshot, vessel file (optional),
//! system info (optional), attribution. Sections are separated by one blank
//! line. Clients and tests depend on the exact layout.

use crate::report::BugReport;

/// Placeholder when the report has no description.
pub const NO_DESCRIPTION: &str = "_No description provided._";
/// Placeholder when the report has no screenshot URL.
pub const NO_SCREENSHOT: &str = "[No screenshot provided]";
/// Attribution used when no user token was sent.
pub const ANONYMOUS: &str = "Anonymous";

/// Build the markdown body for a report.
pub fn compose_body(report: &BugReport) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(5);

    sections.push(format!(
        "## Description\n{}",
        report.description.as_deref().unwrap_or(NO_DESCRIPTION)
    ));

    sections.push(match report.screenshot_url.as_deref() {
        Some(url) => format!("## Screenshot\n![Screenshot]({url})"),
        None => format!("## Screenshot\n{NO_SCREENSHOT}"),
    });

    if let Some(vessel) = &report.vessel {
        sections.push(format!(
            "## Vessel File\n[Download {}]({})",
            vessel.filename, vessel.url
        ));
    }

    if let Some(info) = report.system_info.as_deref() {
        let fence = code_fence(info);
        sections.push(format!(
            "## System Info\n<details>\n<summary>Click to expand</summary>\n\n{fence}text\n{info}\n{fence}\n\n</details>"
        ));
    }

    sections.push(format!(
        "---\nSubmitted by: {}",
        report.user_token.as_deref().unwrap_or(ANONYMOUS)
    ));

    sections.join("\n\n")
}

/// A backtick fence longer than any backtick run in `content`, so the
/// content cannot close the block early.
fn code_fence(content: &str) -> String {
    let longest_run = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest_run + 1).max(3))
}
