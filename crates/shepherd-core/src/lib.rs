//! Core types and utilities for Shepherd billing.
//!
//! This crate provides the foundational types shared by the identity resolver,
//! the Fermata client and the metering service:
//!
//! - **Identifiers**: `EndUserId`, `ProviderCustomerId`
//! - **Metered resources**: `Denomination`, `Feature`
//! - **Transcripts**: `Turn`, `Role` and the pure formatting helpers used to
//!   shape chat history for a language model
//!
//! # Denominations
//!
//! Balances live entirely at Fermata. A denomination names a usage pool
//! (`docchats`, `aitutorchats`, ...) and one unit is one chat.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod denomination;
pub mod ids;
pub mod transcript;

pub use denomination::{Denomination, Feature, FeatureError};
pub use ids::{EndUserId, IdError, ProviderCustomerId};
pub use transcript::{
    append_history_line, coerce_string_boolean, find_last_function_turn, render_conversation,
    wrap_for_downstream, Role, Turn,
};
