//! Metering error types.

use shepherd_core::EndUserId;
use shepherd_identity::LookupError;

/// Errors that escape the metering façade.
///
/// Only identity problems propagate. Fermata failures are reported through
/// the outcome types instead.
#[derive(Debug, thiserror::Error)]
pub enum MeteringError {
    /// The user has no Fermata customer linked.
    #[error("no billing customer linked to user {user_id}")]
    UnresolvedCustomer {
        /// The user that could not be resolved.
        user_id: EndUserId,
    },

    /// The identity store could not be queried.
    #[error("customer lookup failed: {0}")]
    Lookup(#[from] LookupError),
}
