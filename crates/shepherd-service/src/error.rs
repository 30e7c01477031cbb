//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::metering::MeteringError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The user has no billing linkage.
    #[error("no billing customer linked to user {0}")]
    UnresolvedCustomer(String),

    /// The identity store could not be queried.
    #[error("customer lookup failed: {0}")]
    LookupFailure(String),

    /// Metering is not configured on this instance.
    #[error("metering not configured")]
    NotConfigured,
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::UnresolvedCustomer(_) => (
                StatusCode::PRECONDITION_FAILED,
                "unresolved_customer",
                self.to_string(),
            ),
            Self::LookupFailure(msg) => {
                tracing::error!(error = %msg, "Identity lookup failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "lookup_failure",
                    "Customer lookup failed".to_string(),
                )
            }
            Self::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
                self.to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<MeteringError> for ApiError {
    fn from(err: MeteringError) -> Self {
        match err {
            MeteringError::UnresolvedCustomer { user_id } => {
                Self::UnresolvedCustomer(user_id.to_string())
            }
            MeteringError::Lookup(e) => Self::LookupFailure(e.to_string()),
        }
    }
}
