//! Shared helpers for API integration tests.
//!
//! Every test app gets its own temporary upload directory and talks to a
//! wiremock server standing in for the GitHub API.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use bugrelay_api::config::{GitHubConfig, LogFormat, ServerConfig};
use bugrelay_api::router::build_app_router;
use bugrelay_api::state::AppState;
use bugrelay_api::storage::UploadStore;
use bugrelay_core::report::ReportPolicy;
use bugrelay_core::upload::UploadPolicy;
use bugrelay_tracker::GitHubTracker;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_REPO: &str = "octo/game-bugs";
pub const ISSUES_PATH: &str = "/repos/octo/game-bugs/issues";
pub const TEST_HOST: &str = "bugs.test:3000";
pub const BOUNDARY: &str = "----bugrelay-test-boundary";

/// Upload limit used by test apps, small enough to exceed cheaply.
pub const TEST_MAX_UPLOAD_BYTES: usize = 4096;

/// A router plus the resources it depends on. Dropping it removes the
/// upload directory.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Files currently present in the upload directory.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        stored_files(self.upload_dir.path())
    }
}

/// Build a test `ServerConfig` pointing at `github_api_url`.
pub fn test_config(upload_dir: &Path, github_api_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        upload_policy: UploadPolicy::new(
            bugrelay_core::upload::DEFAULT_ALLOWED_EXTENSIONS.iter().copied(),
            TEST_MAX_UPLOAD_BYTES,
        ),
        public_base_url: None,
        report_policy: ReportPolicy::default(),
        github: GitHubConfig {
            api_url: github_api_url.to_string(),
            token: Some(TEST_TOKEN.to_string()),
            repository: Some(TEST_REPO.to_string()),
            timeout_secs: 5,
        },
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router for a config, the same way `main.rs`
/// does.
pub async fn build_app(config: ServerConfig) -> Router {
    let tracker = GitHubTracker::new(
        &config.github.api_url,
        config.github.token.clone(),
        config.github.repository.as_deref(),
        Duration::from_secs(config.github.timeout_secs),
    )
    .expect("tracker builds");
    let uploads = UploadStore::open(&config.upload_dir, config.upload_policy.clone())
        .await
        .expect("upload dir");

    let state = AppState {
        config: Arc::new(config.clone()),
        tracker: Arc::new(tracker),
        uploads: Arc::new(uploads),
    };
    build_app_router(state, &config)
}

/// Build a test app with default test config against `github`.
pub async fn build_test_app(github: &MockServer) -> TestApp {
    build_test_app_with(github, |_| {}).await
}

/// Build a test app, letting the caller tweak the config first.
pub async fn build_test_app_with<F>(github: &MockServer, customize: F) -> TestApp
where
    F: FnOnce(&mut ServerConfig),
{
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(upload_dir.path(), &github.uri());
    customize(&mut config);
    TestApp {
        router: build_app(config).await,
        upload_dir,
    }
}

/// Mount a GitHub issue-creation mock that answers with `number`.
pub async fn mount_create_issue(server: &MockServer, number: u64) {
    Mock::given(method("POST"))
        .and(path(ISSUES_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": number,
            "html_url": format!("https://github.com/{TEST_REPO}/issues/{number}"),
        })))
        .mount(server)
        .await;
}

/// JSON bodies of every issue-creation request the mock received.
pub async fn received_issues(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == ISSUES_PATH)
        .map(|r| serde_json::from_slice(&r.body).expect("issue payload is JSON"))
        .collect()
}

/// Files currently present in `dir`.
pub fn stored_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("host", TEST_HOST)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", TEST_HOST)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", TEST_HOST)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", TEST_HOST)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Minimal multipart/form-data encoder using [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Strip scheme and host from an absolute URL returned by the API.
pub fn path_of(url: &str) -> &str {
    match url.find("://") {
        Some(i) => {
            let rest = &url[i + 3..];
            rest.find('/').map(|p| &rest[p..]).unwrap_or("/")
        }
        None => url,
    }
}
