use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use bugrelay_core::report::ReportPolicy;
use bugrelay_core::upload::{UploadPolicy, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES};
use bugrelay_tracker::DEFAULT_API_URL;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Issue tracker connection settings.
#[derive(Clone)]
pub struct GitHubConfig {
    /// API root (default: `https://api.github.com`).
    pub api_url: String,
    /// API token. Never logged.
    pub token: Option<String>,
    /// Target repository as `owner/name`.
    pub repository: Option<String>,
    /// Timeout for the outbound issue-creation call in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("repository", &self.repository)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// Built once at startup and shared read-only through `AppState`.
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Flat directory holding uploaded vessel files.
    pub upload_dir: PathBuf,
    /// Extension allow-list and size ceiling for uploads.
    pub upload_policy: UploadPolicy,
    /// Overrides the scheme and host used in returned file URLs.
    pub public_base_url: Option<String>,
    /// Report validation switches.
    pub report_policy: ReportPolicy,
    /// Issue tracker settings.
    pub github: GitHubConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `3000`                   |
    /// | `CORS_ORIGINS`         | `*`                      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `UPLOAD_DIR`           | `uploads`                |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`               |
    /// | `ALLOWED_EXTENSIONS`   | `craft,sfs,txt,log,json,png,jpg,jpeg,zip` |
    /// | `PUBLIC_BASE_URL`      | unset                    |
    /// | `REQUIRE_DESCRIPTION`  | `false`                  |
    /// | `GITHUB_TOKEN`         | unset                    |
    /// | `GITHUB_REPO`          | unset                    |
    /// | `GITHUB_API_URL`       | `https://api.github.com` |
    /// | `GITHUB_TIMEOUT_SECS`  | `15`                     |
    /// | `LOG_FORMAT`           | `pretty`                 |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(var("PORT"), "PORT", 3000);

        let cors_origins = split_list(var("CORS_ORIGINS").as_deref().unwrap_or("*"));

        let request_timeout_secs: u64 =
            parse_or(var("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 30);

        let upload_dir = PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| "uploads".into()));

        let max_upload_bytes: usize =
            parse_or(var("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);

        let allowed_extensions = match var("ALLOWED_EXTENSIONS") {
            Some(list) => split_list(&list),
            None => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        };

        let public_base_url = var("PUBLIC_BASE_URL").map(|u| u.trim_end_matches('/').to_string());

        let require_description = var("REQUIRE_DESCRIPTION")
            .map(|v| parse_bool(&v, "REQUIRE_DESCRIPTION"))
            .unwrap_or(false);

        let github = GitHubConfig {
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            token: var("GITHUB_TOKEN"),
            repository: var("GITHUB_REPO"),
            timeout_secs: parse_or(var("GITHUB_TIMEOUT_SECS"), "GITHUB_TIMEOUT_SECS", 15),
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => panic!("LOG_FORMAT must be 'pretty' or 'json', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            upload_policy: UploadPolicy::new(allowed_extensions, max_upload_bytes),
            public_base_url,
            report_policy: ReportPolicy {
                require_description,
            },
            github,
            log_format,
        }
    }
}

fn parse_or<T>(value: Option<String>, name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(v) => v
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
        None => default,
    }
}

fn parse_bool(value: &str, name: &str) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        other => panic!("{name} must be a boolean, got '{other}'"),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
