//! Firebase Realtime Database resolver.
//!
//! Reads the customer ID field through the database's REST interface:
//! `GET {database_url}/user-subscriptions/{uid}/fermataCustomerId.json`.
//! The database answers `null` when the path holds no value.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use shepherd_core::{EndUserId, ProviderCustomerId};

use crate::error::{LookupError, Result};
use crate::keys;
use crate::CustomerResolver;

/// Firebase resolver options.
#[derive(Clone)]
pub struct ResolverOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Database secret or ID token sent as the `auth` query parameter.
    pub auth_token: Option<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            auth_token: None,
        }
    }
}

/// Resolves customers from a Firebase Realtime Database.
#[derive(Clone)]
pub struct FirebaseResolver {
    client: Client,
    database_url: Url,
    auth_token: Option<String>,
}

impl fmt::Debug for ResolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverOptions")
            .field("timeout_seconds", &self.timeout_seconds)
            .field("auth_token", &redacted(self.auth_token.as_ref()))
            .finish()
    }
}

impl fmt::Debug for FirebaseResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseResolver")
            .field("database_url", &self.database_url.as_str())
            .field("auth_token", &redacted(self.auth_token.as_ref()))
            .finish_non_exhaustive()
    }
}

fn redacted(token: Option<&String>) -> Option<&'static str> {
    token.map(|_| "<redacted>")
}

impl FirebaseResolver {
    /// Create a resolver for the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Configuration` if the URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(database_url: &str, options: ResolverOptions) -> Result<Self> {
        let database_url = Url::parse(database_url.trim_end_matches('/'))
            .map_err(|e| LookupError::Configuration(format!("invalid database URL: {e}")))?;
        if database_url.cannot_be_a_base() {
            return Err(LookupError::Configuration(format!(
                "database URL cannot be a base: {database_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| LookupError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            database_url,
            auth_token: options.auth_token,
        })
    }

    /// Build the REST URL of the customer ID field for a user.
    fn customer_id_url(&self, user_id: &EndUserId) -> Result<Url> {
        let [root, uid, field] = keys::customer_id_segments(user_id);
        let mut url = self.database_url.clone();
        url.path_segments_mut()
            .map_err(|()| LookupError::Configuration("database URL cannot be a base".into()))?
            .pop_if_empty()
            .push(root)
            .push(uid)
            .push(&format!("{field}.json"));
        Ok(url)
    }
}

#[async_trait]
impl CustomerResolver for FirebaseResolver {
    async fn resolve(&self, user_id: &EndUserId) -> Result<Option<ProviderCustomerId>> {
        let url = self.customer_id_url(user_id)?;

        let mut request = self.client.get(url);
        if let Some(token) = &self.auth_token {
            request = request.query(&[("auth", token)]);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                user_id = %user_id,
                status = status.as_u16(),
                "Identity store rejected customer lookup"
            );
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;

        Ok(customer_from_value(user_id, value))
    }
}

/// Interpret the stored field value.
///
/// Only a non-empty string is a usable customer ID; anything else means the
/// user has no billing linkage.
fn customer_from_value(user_id: &EndUserId, value: Value) -> Option<ProviderCustomerId> {
    match value {
        Value::Null => {
            tracing::debug!(user_id = %user_id, "No customer ID stored");
            None
        }
        Value::String(raw) => match ProviderCustomerId::new(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(user_id = %user_id, "Stored customer ID is empty");
                None
            }
        },
        other => {
            tracing::warn!(
                user_id = %user_id,
                path = %keys::customer_id_path(user_id),
                value = %other,
                "Stored customer ID is not a string"
            );
            None
        }
    }
}
