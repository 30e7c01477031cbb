//! Fermata HTTP client implementation.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, Url};
use std::time::Duration;

use shepherd_core::{Denomination, ProviderCustomerId};

use crate::error::FermataError;
use crate::types::{
    BalanceResponse, EventReceipt, EventResponse, FermataCredentials, UsageEvent,
};

/// Production Fermata API.
pub const DEFAULT_BASE_URL: &str = "https://api.gofermata.com";

/// Fermata API client.
///
/// Reads balances and pushes usage events for customer accounts.
#[derive(Debug, Clone)]
pub struct FermataClient {
    client: Client,
    base_url: Url,
    credentials: FermataCredentials,
}

impl FermataClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns `FermataError::Configuration` if the HTTP client cannot be built.
    pub fn new(credentials: FermataCredentials) -> Result<Self, FermataError> {
        Self::with_options(credentials, ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `FermataError::Configuration` if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn with_options(
        credentials: FermataCredentials,
        options: ClientOptions,
    ) -> Result<Self, FermataError> {
        let base_url = Url::parse(options.base_url.trim_end_matches('/'))
            .map_err(|e| FermataError::Configuration(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FermataError::Configuration(format!(
                "base URL cannot be a base: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| FermataError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Read the balance of `denomination` for a customer.
    ///
    /// Returns `Ok(None)` when Fermata has no balance to report: an empty body,
    /// a body without `data.amount`, or a 5xx answer.
    ///
    /// # Errors
    ///
    /// - `FermataError::BalanceFetch` on any other non-success status.
    /// - `FermataError::Http` if the request fails.
    /// - `FermataError::Decode` if a success body is not JSON.
    pub async fn get_balance(
        &self,
        customer_id: &ProviderCustomerId,
        denomination: &Denomination,
    ) -> Result<Option<i64>, FermataError> {
        let url = self.account_url(customer_id, &["balance", denomination.as_str()])?;

        let response = self.authorized(self.client.get(url)).send().await?;
        let status = response.status();

        if status.is_server_error() {
            tracing::warn!(
                customer_id = %customer_id,
                denomination = %denomination,
                status = status.as_u16(),
                "Fermata balance unavailable"
            );
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FermataError::BalanceFetch {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if is_blank(&bytes) {
            return Ok(None);
        }

        let balance: BalanceResponse = serde_json::from_slice(&bytes)?;
        let amount = balance.data.and_then(|d| d.amount);

        tracing::debug!(
            customer_id = %customer_id,
            denomination = %denomination,
            amount = ?amount,
            "Fetched Fermata balance"
        );

        Ok(amount)
    }

    /// Push a usage event to a customer account.
    ///
    /// # Errors
    ///
    /// - `FermataError::EventPush` on any non-success status, 5xx included.
    /// - `FermataError::Http` if the request fails.
    /// - `FermataError::Decode` if a non-empty success body is not the expected
    ///   JSON.
    pub async fn push_event(
        &self,
        customer_id: &ProviderCustomerId,
        event: &UsageEvent,
    ) -> Result<EventReceipt, FermataError> {
        let url = self.account_url(customer_id, &["events"])?;

        let response = self
            .authorized(self.client.post(url))
            .json(event)
            .send()
            .await?;

        let parsed: Option<EventResponse> = Self::expect_success(response).await?;
        let balance = parsed
            .and_then(|p| p.data)
            .and_then(|d| d.balance)
            .and_then(|b| b.amount);

        tracing::info!(
            customer_id = %customer_id,
            event_type = %event.event_type,
            cost = event.cost_override_amount,
            denomination = %event.cost_override_denomination,
            balance = ?balance,
            "Usage event recorded"
        );

        Ok(EventReceipt { balance })
    }

    /// Push a `CHAT` event of `cost` units, gated on balance.
    ///
    /// # Errors
    ///
    /// See [`FermataClient::push_event`].
    pub async fn push_chat_event(
        &self,
        customer_id: &ProviderCustomerId,
        denomination: &Denomination,
        cost: i64,
    ) -> Result<EventReceipt, FermataError> {
        self.push_event(customer_id, &UsageEvent::chat(denomination.clone(), cost))
            .await
    }

    /// Build `{base}/v1/accounts/{customer_id}/{tail...}` with encoded segments.
    fn account_url(
        &self,
        customer_id: &ProviderCustomerId,
        tail: &[&str],
    ) -> Result<Url, FermataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FermataError::Configuration("base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v1", "accounts", customer_id.as_str()])
            .extend(tail);
        Ok(url)
    }

    /// Attach Basic auth and the JSON content type.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.credentials.company_id, Some(&self.credentials.api_key))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Decode a success body, or turn a non-success status into `EventPush`.
    ///
    /// An empty success body (`204 No Content` included) decodes to `None`.
    async fn expect_success<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<Option<T>, FermataError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Fermata rejected usage event"
            );
            return Err(FermataError::EventPush {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if is_blank(&bytes) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// API base URL (default: [`DEFAULT_BASE_URL`]).
    pub base_url: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientOptions {
    /// Options pointing at a different API host.
    #[must_use]
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> FermataClient {
        FermataClient::with_options(
            FermataCredentials::new("co", "key"),
            ClientOptions::with_base_url(base_url),
        )
        .unwrap()
    }

    #[test]
    fn client_creation() {
        let client = FermataClient::new(FermataCredentials::new("co", "key")).unwrap();
        assert_eq!(client.base_url.as_str(), "https://api.gofermata.com/");
    }

    #[test]
    fn balance_url() {
        let customer = ProviderCustomerId::new("acct_1").unwrap();
        let url = client("http://localhost:9000/")
            .account_url(&customer, &["balance", "docchats"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v1/accounts/acct_1/balance/docchats"
        );
    }

    #[test]
    fn account_url_encodes_customer_id() {
        let customer = ProviderCustomerId::new("a/b").unwrap();
        let url = client("http://localhost:9000")
            .account_url(&customer, &["events"])
            .unwrap();
        assert_eq!(url.path(), "/v1/accounts/a%2Fb/events");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = FermataClient::with_options(
            FermataCredentials::new("co", "key"),
            ClientOptions::with_base_url("::not a url::"),
        )
        .unwrap_err();
        assert!(matches!(err, FermataError::Configuration(_)));
    }
}
