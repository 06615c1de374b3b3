//! Health check integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "clipcherry");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn unknown_api_route_is_not_found() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/api/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn wrong_method_on_known_route_is_not_found() {
    let harness = TestHarness::new().await;

    let responses = [
        harness.server.get("/api/register").await,
        harness.server.delete("/api/purchase").await,
        harness.server.put("/api/content").await,
        harness.server.post("/health").await,
    ];

    for response in responses {
        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Not Found");
    }
}
