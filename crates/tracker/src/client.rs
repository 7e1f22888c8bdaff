//! REST client for GitHub issue creation.
//!
//! Wraps `POST /repos/{owner}/{repo}/issues` using [`reqwest`]. One call per
//! report, no retries. The token is held in a wrapper whose `Debug` output
//! is redacted, and it is never included in log fields or errors.

use std::fmt;
use std::time::Duration;

use bugrelay_core::report::IssueDraft;
use serde::Deserialize;

use crate::error::TrackerError;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version requested from GitHub.
const API_VERSION: &str = "2022-11-28";

/// Longest upstream error message kept for logs.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse `owner/name`. Both parts must be non-empty and contain no further
    /// slashes.
    pub fn parse(value: &str) -> Result<Self, TrackerError> {
        let value = value.trim();
        match value.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(TrackerError::InvalidRepository(value.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The part of GitHub's issue response the service returns to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    pub html_url: String,
    pub number: u64,
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone)]
struct Secret(String);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client bound to one repository and one credential.
#[derive(Debug, Clone)]
pub struct GitHubTracker {
    client: reqwest::Client,
    api_url: String,
    token: Option<Secret>,
    repo: Option<RepoRef>,
}

impl GitHubTracker {
    /// Create a tracker client.
    ///
    /// * `api_url` - API root, e.g. [`DEFAULT_API_URL`] or a mock server.
    /// * `token` / `repository` - may be absent; submissions then fail with
    ///   [`TrackerError::NotConfigured`].
    ///
    /// Fails if `repository` is present but malformed, or if the HTTP
    /// client cannot be built.
    pub fn new(
        api_url: &str,
        token: Option<String>,
        repository: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let repo = repository
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(RepoRef::parse)
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bug-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()).map(Secret),
            repo,
        })
    }

    /// Whether both the token and the repository are present.
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.repo.is_some()
    }

    pub fn repo(&self) -> Option<&RepoRef> {
        self.repo.as_ref()
    }

    /// Create an issue from a draft. Emits one log line before the call and
    /// one after it.
    pub async fn create_issue(&self, draft: &IssueDraft) -> Result<CreatedIssue, TrackerError> {
        let (token, repo) = self.credentials().inspect_err(|err| {
            tracing::error!(error = %err, "Tracker issue creation skipped");
        })?;

        tracing::info!(
            repo = %repo,
            title = %draft.title,
            labels = ?draft.labels,
            "Submitting issue to tracker",
        );

        let result = self.send(token, repo, draft).await;

        match &result {
            Ok(issue) => tracing::info!(
                repo = %repo,
                issue_number = issue.number,
                issue_url = %issue.html_url,
                "Tracker issue created",
            ),
            Err(err) => tracing::error!(
                repo = %repo,
                status = err.status_code(),
                error = %err,
                "Tracker issue creation failed",
            ),
        }

        result
    }

    fn credentials(&self) -> Result<(&Secret, &RepoRef), TrackerError> {
        let token = self
            .token
            .as_ref()
            .ok_or(TrackerError::NotConfigured("GITHUB_TOKEN"))?;
        let repo = self
            .repo
            .as_ref()
            .ok_or(TrackerError::NotConfigured("GITHUB_REPO"))?;
        Ok((token, repo))
    }

    async fn send(
        &self,
        token: &Secret,
        repo: &RepoRef,
        draft: &IssueDraft,
    ) -> Result<CreatedIssue, TrackerError> {
        let response = self
            .client
            .post(format!(
                "{}/repos/{}/{}/issues",
                self.api_url, repo.owner, repo.name
            ))
            .bearer_auth(&token.0)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        response
            .json::<CreatedIssue>()
            .await
            .map_err(|e| TrackerError::InvalidResponse(e.to_string()))
    }
}

/// Pull GitHub's `message` field out of an error body, falling back to the
/// raw (truncated) body.
fn upstream_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    message.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
