//! Public URLs for stored uploads.
//!
//! The base URL is `PUBLIC_BASE_URL` when configured. Otherwise it is taken
//! from the request itself, honouring `X-Forwarded-Proto` / `X-Forwarded-Host`
//! set by a reverse proxy. Without any host information the URL is relative.

use axum::http::header::HOST;
use axum::http::HeaderMap;

/// Path prefix under which the upload directory is served.
pub const UPLOADS_PREFIX: &str = "/uploads";

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Scheme and host (no trailing slash) for URLs handed back to the client.
pub fn base_url(headers: &HeaderMap, configured: Option<&str>) -> String {
    if let Some(base) = configured {
        return base.trim_end_matches('/').to_string();
    }

    let host = first_value(headers, FORWARDED_HOST).or_else(|| first_value(headers, HOST.as_str()));
    match host {
        Some(host) => {
            let scheme = first_value(headers, FORWARDED_PROTO).unwrap_or_else(|| "http".into());
            format!("{scheme}://{host}")
        }
        None => String::new(),
    }
}

/// URL of a stored file.
pub fn upload_url(base: &str, stored_filename: &str) -> String {
    format!("{base}{UPLOADS_PREFIX}/{stored_filename}")
}

/// First comma-separated value of a header, trimmed.
fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
