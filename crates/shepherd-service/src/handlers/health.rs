//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Whether metered routes are available.
    pub fermata_configured: bool,
}

/// Root greeting.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Greeting message.
    pub message: String,
}

/// Root endpoint.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hello World".to_string(),
    })
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "shepherd-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        fermata_configured: state.has_metering(),
    })
}
