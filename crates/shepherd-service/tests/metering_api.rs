//! Metering endpoint integration tests.

mod common;

use axum::http::StatusCode;
use serde_json::Value;
use wiremock::ResponseTemplate;

use common::{
    balance_body, error_code, event_body, mount_balance, mount_events, unconfigured_server,
    TestHarness,
};
use shepherd_service::FailurePolicy;

// ============================================================================
// Balance gate
// ============================================================================

#[tokio::test]
async fn balance_gate_allows_positive_balance() {
    let harness = TestHarness::new().await;
    mount_balance(&harness.fermata, "docchats", balance_body(3)).await;

    let response = harness
        .server
        .get("/v1/metering/chat/users/uid_1/balance")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["feature"], "chat");
    assert_eq!(body["denomination"], "docchats");
    assert_eq!(body["insufficient"], false);
    assert_eq!(body["balance"], 3);
    assert_eq!(body["status"], "available");
}

#[tokio::test]
async fn balance_gate_denies_zero_balance() {
    let harness = TestHarness::new().await;
    mount_balance(&harness.fermata, "aitutorchats", balance_body(0)).await;

    let response = harness
        .server
        .get("/v1/metering/tutor-chat/users/uid_1/balance")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["denomination"], "aitutorchats");
    assert_eq!(body["insufficient"], true);
    assert_eq!(body["status"], "exhausted");
}

#[tokio::test]
async fn balance_gate_denies_when_fermata_has_no_balance() {
    let harness = TestHarness::new().await;
    mount_balance(&harness.fermata, "docchats", ResponseTemplate::new(500)).await;

    let response = harness
        .server
        .get("/v1/metering/chat/users/uid_1/balance")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["insufficient"], true);
    assert_eq!(body["balance"], Value::Null);
    assert_eq!(body["status"], "no_record");
}

#[tokio::test]
async fn balance_gate_fails_closed_on_rejected_lookup() {
    let harness = TestHarness::new().await;
    mount_balance(&harness.fermata, "docchats", ResponseTemplate::new(401)).await;

    let response = harness
        .server
        .get("/v1/metering/chat/users/uid_1/balance")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["insufficient"], true);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn balance_gate_can_fail_open() {
    let harness = TestHarness::with_policy(FailurePolicy::Open).await;
    mount_balance(&harness.fermata, "docchats", ResponseTemplate::new(401)).await;

    let response = harness
        .server
        .get("/v1/metering/chat/users/uid_1/balance")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["insufficient"], false);
    assert_eq!(body["status"], "unavailable");
}

// ============================================================================
// Consume
// ============================================================================

#[tokio::test]
async fn consume_returns_new_balance() {
    let harness = TestHarness::new().await;
    mount_events(&harness.fermata, event_body(2)).await;

    let response = harness
        .server
        .post("/v1/metering/tutor-chat/users/uid_1/consume")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["feature"], "tutor-chat");
    assert_eq!(body["denomination"], "aitutorchats");
    assert_eq!(body["recorded"], true);
    assert_eq!(body["balance"], 2);
    assert_eq!(body["status"], "recorded");
}

#[tokio::test]
async fn consume_failure_reports_zero_balance() {
    let harness = TestHarness::new().await;
    mount_events(
        &harness.fermata,
        ResponseTemplate::new(503).set_body_string("maintenance"),
    )
    .await;

    let response = harness
        .server
        .post("/v1/metering/chat/users/uid_1/consume")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recorded"], false);
    assert_eq!(body["balance"], 0);
    assert_eq!(body["status"], "failed");
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn unlinked_user_is_precondition_failed() {
    let harness = TestHarness::new().await;

    let balance = harness
        .server
        .get("/v1/metering/chat/users/stranger/balance")
        .await;
    balance.assert_status(StatusCode::PRECONDITION_FAILED);
    assert_eq!(error_code(&balance.json()), "unresolved_customer");

    let consume = harness
        .server
        .post("/v1/metering/chat/users/stranger/consume")
        .await;
    consume.assert_status(StatusCode::PRECONDITION_FAILED);

    assert_eq!(harness.fermata_calls().await, 0);
}

#[tokio::test]
async fn unlinking_a_user_takes_effect() {
    let harness = TestHarness::new().await;
    harness.resolver.unlink(&common::user()).await;

    let response = harness
        .server
        .get("/v1/metering/chat/users/uid_1/balance")
        .await;

    response.assert_status(StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn unknown_feature_is_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/v1/metering/essays/users/uid_1/balance")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "bad_request");
    assert_eq!(harness.fermata_calls().await, 0);
}

#[tokio::test]
async fn metering_without_credentials_is_unavailable() {
    let server = unconfigured_server();

    let response = server.get("/v1/metering/chat/users/uid_1/balance").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&response.json()), "not_configured");
}

#[tokio::test]
async fn consume_with_no_content_answer_is_recorded() {
    let harness = TestHarness::new().await;
    mount_events(&harness.fermata, ResponseTemplate::new(204)).await;

    let response = harness
        .server
        .post("/v1/metering/chat/users/uid_1/consume")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recorded"], true);
    assert_eq!(body["balance"], 0);
    assert_eq!(body["status"], "recorded_without_balance");
}
