//! HTTP shell integration tests
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, test_config, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(
        body,
        json!({"status": "ok", "message": "StudyBuddy server is running"})
    );
}

#[tokio::test]
async fn test_health_uses_app_name() {
    let config = test_config(&[("APP_NAME", "Quizzy")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();

    let response = server.get("/api/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["message"], "Quizzy server is running");
}

#[tokio::test]
async fn test_request_id_header() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/health").await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/chat-sessions").await.unwrap();
    let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();

    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Route not found: GET /api/chat-sessions");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let config = test_config(&[("CORS_ALLOWED_ORIGINS", "http://localhost:3000")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();

    let allowed = server
        .get_with_origin("/api/health", "http://localhost:3000")
        .await
        .unwrap();
    assert_eq!(
        allowed.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );

    let other = server
        .get_with_origin("/api/health", "http://evil.test")
        .await
        .unwrap();
    assert!(other.headers().get("access-control-allow-origin").is_none());
}
