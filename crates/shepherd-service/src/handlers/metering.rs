//! Metering handlers.
//!
//! Route handlers for the tutoring API call these before starting a metered
//! chat (balance gate) and after it completes (consume).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use shepherd_core::{EndUserId, Feature};

use crate::error::ApiError;
use crate::metering::Metering;
use crate::state::AppState;

/// Balance gate response.
#[derive(Debug, Serialize)]
pub struct BalanceGateResponse {
    /// Feature checked.
    pub feature: Feature,
    /// Denomination the feature draws from.
    pub denomination: String,
    /// Whether the user must be denied the feature.
    pub insufficient: bool,
    /// Balance reported by Fermata, if any.
    pub balance: Option<i64>,
    /// Outcome label (`available`, `exhausted`, `no_record`, `unavailable`).
    pub status: &'static str,
}

/// Consume response.
#[derive(Debug, Serialize)]
pub struct ConsumeResponse {
    /// Feature charged.
    pub feature: Feature,
    /// Denomination charged.
    pub denomination: String,
    /// Whether Fermata accepted the usage event.
    pub recorded: bool,
    /// New balance, or 0 when unknown.
    pub balance: i64,
    /// Outcome label (`recorded`, `recorded_without_balance`, `failed`).
    pub status: &'static str,
}

/// Check whether a user may start a metered chat.
pub async fn check_balance(
    State(state): State<Arc<AppState>>,
    Path((feature, user_id)): Path<(String, String)>,
) -> Result<Json<BalanceGateResponse>, ApiError> {
    let metering = metering(&state)?;
    let (feature, user_id) = parse_target(&feature, &user_id)?;
    let denomination = feature.denomination();

    let check = metering.check_balance(&user_id, &denomination).await?;
    let insufficient = check.is_insufficient(metering.policy());

    tracing::debug!(
        user_id = %user_id,
        feature = %feature,
        status = check.status(),
        insufficient,
        "Balance gate evaluated"
    );

    Ok(Json(BalanceGateResponse {
        feature,
        denomination: denomination.to_string(),
        insufficient,
        balance: check.balance(),
        status: check.status(),
    }))
}

/// Charge one unit of a feature to a user.
pub async fn consume(
    State(state): State<Arc<AppState>>,
    Path((feature, user_id)): Path<(String, String)>,
) -> Result<Json<ConsumeResponse>, ApiError> {
    let metering = metering(&state)?;
    let (feature, user_id) = parse_target(&feature, &user_id)?;

    let consumption = metering.consume_feature(&user_id, feature).await?;

    Ok(Json(ConsumeResponse {
        feature,
        denomination: feature.denomination().to_string(),
        recorded: consumption.is_recorded(),
        balance: consumption.balance(),
        status: consumption.status(),
    }))
}

fn metering(state: &AppState) -> Result<&Metering, ApiError> {
    state.metering.as_deref().ok_or(ApiError::NotConfigured)
}

fn parse_target(feature: &str, user_id: &str) -> Result<(Feature, EndUserId), ApiError> {
    let feature = feature
        .parse::<Feature>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let user_id = user_id
        .parse::<EndUserId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok((feature, user_id))
}
