//! Identity resolution for Shepherd billing.
//!
//! Maps an end user (Firebase UID) to the Fermata customer that holds their
//! balances. The link lives in the Firebase Realtime Database at
//! `user-subscriptions/{uid}/fermataCustomerId` and is written elsewhere; this
//! crate only reads it.
//!
//! A missing link resolves to `Ok(None)`. An unreachable or misbehaving store
//! is a [`LookupError`]. Callers must keep the two apart.
//!
//! # Example
//!
//! ```no_run
//! use shepherd_core::EndUserId;
//! use shepherd_identity::{CustomerResolver, FirebaseResolver, ResolverOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = FirebaseResolver::new(
//!     "https://my-app-default-rtdb.firebaseio.com",
//!     ResolverOptions::default(),
//! )?;
//!
//! let user = EndUserId::new("firebase-uid")?;
//! match resolver.resolve(&user).await? {
//!     Some(customer) => println!("customer: {customer}"),
//!     None => println!("no billing linkage"),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod firebase;
pub mod keys;
pub mod memory;

pub use error::{LookupError, Result};
pub use firebase::{FirebaseResolver, ResolverOptions};
pub use memory::InMemoryResolver;

use async_trait::async_trait;
use shepherd_core::{EndUserId, ProviderCustomerId};

/// Looks up the Fermata customer linked to an end user.
///
/// Implementations are read-only.
#[async_trait]
pub trait CustomerResolver: Send + Sync {
    /// Resolve a user to their customer ID.
    ///
    /// Returns `Ok(None)` when the user has no customer link.
    ///
    /// # Errors
    ///
    /// Returns a `LookupError` if the identity store cannot be queried.
    async fn resolve(&self, user_id: &EndUserId) -> Result<Option<ProviderCustomerId>>;
}
