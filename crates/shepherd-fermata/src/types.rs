//! Fermata API types.

use serde::{Deserialize, Serialize};
use std::fmt;

use shepherd_core::Denomination;

/// Event type tag for chat consumption.
pub const CHAT_EVENT: &str = "CHAT";

/// Fermata API credentials, sent as HTTP Basic auth.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct FermataCredentials {
    /// Company ID (Basic auth user).
    pub company_id: String,
    /// API key (Basic auth password).
    pub api_key: String,
}

impl FermataCredentials {
    /// Create credentials.
    #[must_use]
    pub fn new(company_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for FermataCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FermataCredentials")
            .field("company_id", &self.company_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A consumption record pushed to an account.
///
/// Fermata records the event and, when `gate_on_balance` is set, decrements
/// the balance of `cost_override_denomination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEvent {
    /// Event type tag (e.g. `CHAT`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Units charged.
    pub cost_override_amount: i64,
    /// Pool the units are charged to.
    pub cost_override_denomination: Denomination,
    /// Whether the event is gated on (and deducted from) the balance.
    pub gate_on_balance: bool,
}

impl UsageEvent {
    /// A chat event of `cost` units, gated on balance.
    #[must_use]
    pub fn chat(denomination: Denomination, cost: i64) -> Self {
        Self {
            event_type: CHAT_EVENT.to_string(),
            cost_override_amount: cost,
            cost_override_denomination: denomination,
            gate_on_balance: true,
        }
    }
}

/// Result of a pushed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventReceipt {
    /// Post-event balance reported by Fermata, if any.
    pub balance: Option<i64>,
}

/// Amount wrapper used in several responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Amount {
    #[serde(default)]
    pub amount: Option<i64>,
}

/// `GET /v1/accounts/{id}/balance/{denomination}` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BalanceResponse {
    #[serde(default)]
    pub data: Option<Amount>,
}

/// `POST /v1/accounts/{id}/events` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventResponse {
    #[serde(default)]
    pub data: Option<EventData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventData {
    #[serde(default)]
    pub balance: Option<Amount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_event_wire_format() {
        let event = UsageEvent::chat(Denomination::DOCCHATS, 1);
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "CHAT",
                "cost_override_amount": 1,
                "cost_override_denomination": "docchats",
                "gate_on_balance": true
            })
        );
    }

    #[test]
    fn balance_response_tolerates_missing_fields() {
        let full: BalanceResponse =
            serde_json::from_value(json!({"data": {"amount": 5, "denomination": "docchats"}}))
                .unwrap();
        assert_eq!(full.data.and_then(|d| d.amount), Some(5));

        let empty: BalanceResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.data.is_none());

        let no_amount: BalanceResponse = serde_json::from_value(json!({"data": {}})).unwrap();
        assert_eq!(no_amount.data.and_then(|d| d.amount), None);
    }

    #[test]
    fn event_response_balance() {
        let resp: EventResponse =
            serde_json::from_value(json!({"data": {"balance": {"amount": 3}, "id": "evt_1"}}))
                .unwrap();
        assert_eq!(resp.data.and_then(|d| d.balance).and_then(|b| b.amount), Some(3));
    }

    #[test]
    fn credentials_debug_redacts_key() {
        let creds = FermataCredentials::new("co_1", "super-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("co_1"));
        assert!(!debug.contains("super-secret"));
    }
}
