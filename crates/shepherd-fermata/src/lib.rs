//! Fermata usage-billing client.
//!
//! Fermata is the system of record for chat balances. This crate reads a
//! customer's balance in a denomination and pushes usage events that decrement
//! it. Nothing is cached: every call is a live round trip.
//!
//! Balance reads are advisory, so a 5xx answer degrades to "unknown"
//! (`Ok(None)`). Usage events are billing-critical, so every non-success
//! answer is an error.
//!
//! # Example
//!
//! ```no_run
//! use shepherd_core::{Denomination, ProviderCustomerId};
//! use shepherd_fermata::{FermataClient, FermataCredentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FermataClient::new(FermataCredentials::new("company-id", "api-key"))?;
//! let customer = ProviderCustomerId::new("acct_123")?;
//!
//! let balance = client.get_balance(&customer, &Denomination::DOCCHATS).await?;
//! println!("balance: {balance:?}");
//!
//! let receipt = client
//!     .push_chat_event(&customer, &Denomination::DOCCHATS, 1)
//!     .await?;
//! println!("after chat: {:?}", receipt.balance);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, FermataClient, DEFAULT_BASE_URL};
pub use error::FermataError;
pub use types::{EventReceipt, FermataCredentials, UsageEvent, CHAT_EVENT};
