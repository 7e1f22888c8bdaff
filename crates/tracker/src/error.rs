//! Error type for issue tracker calls.

/// Errors from a single issue-creation attempt.
///
/// None of the variants carry the API token.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Token or repository were not supplied at startup.
    #[error("Issue tracker is not configured: missing {0}")]
    NotConfigured(&'static str),

    /// The repository identifier is not of the form `owner/name`.
    #[error("Invalid repository identifier '{0}', expected 'owner/name'")]
    InvalidRepository(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The tracker answered with a non-2xx status.
    #[error("Issue tracker returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A 2xx response whose body could not be understood.
    #[error("Unexpected response from issue tracker: {0}")]
    InvalidResponse(String),
}

impl TrackerError {
    /// HTTP status to surface to the caller: the upstream status when one
    /// was received, 504 for timeouts, 500 otherwise.
    pub fn status_code(&self) -> u16 {
        match self {
            TrackerError::Upstream { status, .. } => *status,
            TrackerError::Request(err) if err.is_timeout() => 504,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_passed_through() {
        let err = TrackerError::Upstream {
            status: 422,
            message: "Validation Failed".into(),
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(
            err.to_string(),
            "Issue tracker returned HTTP 422: Validation Failed"
        );
    }

    #[test]
    fn unknown_failures_default_to_500() {
        assert_eq!(TrackerError::NotConfigured("token").status_code(), 500);
        assert_eq!(TrackerError::InvalidResponse("eof".into()).status_code(), 500);
    }

    #[test]
    fn request_error_display() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = TrackerError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
        assert_eq!(err.status_code(), 500);
    }
}
