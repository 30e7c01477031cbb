//! Common test utilities for shepherd-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shepherd_core::{EndUserId, ProviderCustomerId};
use shepherd_fermata::{ClientOptions, FermataClient, FermataCredentials};
use shepherd_identity::InMemoryResolver;
use shepherd_service::{create_router, AppState, FailurePolicy, Metering, ServiceConfig};

/// Linked user used by most tests.
pub const USER: &str = "uid_1";
/// Fermata account linked to [`USER`].
pub const CUSTOMER: &str = "acct_1";

pub fn user() -> EndUserId {
    EndUserId::new(USER).unwrap()
}

pub fn customer() -> ProviderCustomerId {
    ProviderCustomerId::new(CUSTOMER).unwrap()
}

/// Fermata client pointed at a mock server.
pub fn fermata_client(server: &MockServer) -> FermataClient {
    FermataClient::with_options(
        FermataCredentials::new("acme", "secret"),
        ClientOptions::with_base_url(server.uri()),
    )
    .expect("Failed to create Fermata client")
}

/// Resolver that knows only [`USER`].
pub fn linked_resolver() -> Arc<InMemoryResolver> {
    Arc::new(InMemoryResolver::new().with_customer(user(), customer()))
}

/// Config suitable for tests (permissive CORS, loopback address).
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        cors_origins: vec!["*".into()],
        ..ServiceConfig::default()
    }
}

/// Mount a balance answer for [`CUSTOMER`].
pub async fn mount_balance(server: &MockServer, denomination: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{CUSTOMER}/balance/{denomination}")))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mount an event answer for [`CUSTOMER`].
pub async fn mount_events(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/accounts/{CUSTOMER}/events")))
        .respond_with(response)
        .mount(server)
        .await;
}

/// `{"data": {"amount": n}}`
pub fn balance_body(amount: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {"amount": amount}}))
}

/// `{"data": {"balance": {"amount": n}}}`
pub fn event_body(amount: i64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({"data": {"id": "evt_1", "balance": {"amount": amount}}}))
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Mock Fermata API.
    pub fermata: MockServer,
    /// Identity links visible to the service.
    pub resolver: Arc<InMemoryResolver>,
}

impl TestHarness {
    /// Create a harness with the default fail-closed policy.
    pub async fn new() -> Self {
        Self::with_policy(FailurePolicy::Closed).await
    }

    /// Create a harness with a specific failure policy.
    pub async fn with_policy(policy: FailurePolicy) -> Self {
        let fermata = MockServer::start().await;
        let resolver = linked_resolver();

        let metering =
            Metering::new(resolver.clone(), fermata_client(&fermata)).with_policy(policy);
        let state = AppState::with_metering(test_config(), metering);

        let server =
            TestServer::new(create_router(state)).expect("Failed to create test server");

        Self {
            server,
            fermata,
            resolver,
        }
    }

    /// Number of requests the mock Fermata API has seen.
    pub async fn fermata_calls(&self) -> usize {
        self.fermata
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

/// Server without Fermata credentials.
pub fn unconfigured_server() -> TestServer {
    let state = AppState::new(test_config());
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

/// Extract `error.code` from an error envelope.
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
