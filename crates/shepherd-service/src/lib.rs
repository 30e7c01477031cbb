//! Shepherd metering service.
//!
//! This crate gates metered tutoring features on Fermata balances:
//!
//! - [`Metering`] composes the identity resolver and the Fermata client
//! - [`ServiceConfig`] loads credentials and endpoints from the environment
//! - [`create_router`] exposes the balance gate and the consume call over HTTP
//!
//! # Failure handling
//!
//! A user without billing linkage is a hard error (`412`). A degraded Fermata
//! never fails the request: the gate denies the feature under the default
//! fail-closed policy, and a failed charge reports `recorded: false`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod config;
pub mod error;
pub mod handlers;
pub mod metering;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use metering::{BalanceCheck, Consumption, FailurePolicy, Metering, MeteringError};
pub use routes::create_router;
pub use state::AppState;
