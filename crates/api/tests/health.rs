mod common;

use axum::http::StatusCode;
use wiremock::MockServer;

use common::{body_json, build_test_app, get};

#[tokio::test]
async fn health_reports_ok_and_version() {
    let github = MockServer::start().await;
    let app = build_test_app(&github).await;

    let response = get(app.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let github = MockServer::start().await;
    let app = build_test_app(&github).await;

    let response = get(app.app(), "/health").await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let github = MockServer::start().await;
    let app = build_test_app(&github).await;

    let response = get(app.app(), "/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_upload_is_404() {
    let github = MockServer::start().await;
    let app = build_test_app(&github).await;

    let response = get(app.app(), "/uploads/nope.craft").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
