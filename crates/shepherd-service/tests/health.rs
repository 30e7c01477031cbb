//! Health endpoint integration tests.

mod common;

use common::{unconfigured_server, TestHarness};

#[tokio::test]
async fn root_says_hello() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/").await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({"message": "Hello World"}));
}

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "shepherd-service");
    assert_eq!(body["fermata_configured"], true);
}

#[tokio::test]
async fn health_reports_missing_fermata() {
    let server = unconfigured_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["fermata_configured"], false);
}
