//! Health, metrics and response header integration tests.

mod common;

use account_service::services::metrics::init_metrics;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::TestApp;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_reports_store_sizes() {
    let app = TestApp::spawn().await;
    app.signup("alice", "user").await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "account-service-test");
    assert_eq!(body["checks"]["users"], 1);
    assert_eq!(body["checks"]["accounts"], 0);
}

#[tokio::test]
async fn metrics_exposes_ledger_counters() {
    init_metrics();
    let app = TestApp::spawn().await;
    let (_, admin) = app.signup("root", "admin").await;
    app.create_account(&admin, 1, 0.0).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("ledger_operations_total"));
    assert!(text.contains("operation=\"create_account\""));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::spawn().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-request-id"], "req-123");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}
