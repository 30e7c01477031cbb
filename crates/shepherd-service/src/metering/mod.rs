//! Metering façade.
//!
//! Composes the identity resolver and the Fermata client into the two gates
//! the tutoring routes need: "may this user start a metered chat?" and
//! "charge one chat". Each call is a short sequential chain: resolve the
//! customer, then one Fermata round trip.
//!
//! Identity failures propagate as [`MeteringError`]. Fermata failures are
//! logged and reported as [`BalanceCheck::Unavailable`] or
//! [`Consumption::Failed`].

mod error;
mod outcome;

pub use error::MeteringError;
pub use outcome::{BalanceCheck, Consumption, FailurePolicy};

use std::sync::Arc;

use shepherd_core::{Denomination, EndUserId, Feature, ProviderCustomerId};
use shepherd_fermata::FermataClient;
use shepherd_identity::CustomerResolver;

/// Per-feature balance gate and consumption recorder.
#[derive(Clone)]
pub struct Metering {
    resolver: Arc<dyn CustomerResolver>,
    fermata: FermataClient,
    policy: FailurePolicy,
}

impl std::fmt::Debug for Metering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metering")
            .field("fermata", &self.fermata)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Metering {
    /// Create a façade with the default (fail-closed) policy.
    #[must_use]
    pub fn new(resolver: Arc<dyn CustomerResolver>, fermata: FermataClient) -> Self {
        Self {
            resolver,
            fermata,
            policy: FailurePolicy::default(),
        }
    }

    /// Set the policy applied when Fermata cannot be consulted.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active failure policy.
    #[must_use]
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Read the user's balance in `denomination`.
    ///
    /// # Errors
    ///
    /// - `MeteringError::UnresolvedCustomer` if the user has no customer link.
    /// - `MeteringError::Lookup` if the identity store cannot be queried.
    pub async fn check_balance(
        &self,
        user_id: &EndUserId,
        denomination: &Denomination,
    ) -> Result<BalanceCheck, MeteringError> {
        let customer_id = self.customer_for(user_id).await?;

        match self.fermata.get_balance(&customer_id, denomination).await {
            Ok(balance) => Ok(BalanceCheck::from_balance(balance)),
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    customer_id = %customer_id,
                    denomination = %denomination,
                    error = %e,
                    "Error getting balance"
                );
                Ok(BalanceCheck::Unavailable {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Whether the user must be denied a metered action in `denomination`.
    ///
    /// True when the balance is absent or below one unit. When Fermata cannot
    /// be consulted the answer follows the configured [`FailurePolicy`].
    ///
    /// # Errors
    ///
    /// See [`Metering::check_balance`].
    pub async fn has_insufficient_balance(
        &self,
        user_id: &EndUserId,
        denomination: &Denomination,
    ) -> Result<bool, MeteringError> {
        let check = self.check_balance(user_id, denomination).await?;
        Ok(check.is_insufficient(self.policy))
    }

    /// Charge one unit of `denomination` to the user.
    ///
    /// # Errors
    ///
    /// - `MeteringError::UnresolvedCustomer` if the user has no customer link.
    /// - `MeteringError::Lookup` if the identity store cannot be queried.
    pub async fn consume_one(
        &self,
        user_id: &EndUserId,
        denomination: &Denomination,
    ) -> Result<Consumption, MeteringError> {
        let customer_id = self.customer_for(user_id).await?;

        match self
            .fermata
            .push_chat_event(&customer_id, denomination, 1)
            .await
        {
            Ok(receipt) => Ok(match receipt.balance {
                Some(balance) => Consumption::Recorded { balance },
                None => {
                    tracing::warn!(
                        user_id = %user_id,
                        denomination = %denomination,
                        "Usage event recorded without a balance"
                    );
                    Consumption::RecordedWithoutBalance
                }
            }),
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    customer_id = %customer_id,
                    denomination = %denomination,
                    error = %e,
                    "Error setting balance"
                );
                Ok(Consumption::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// [`Metering::has_insufficient_balance`] for a feature's denomination.
    ///
    /// # Errors
    ///
    /// See [`Metering::check_balance`].
    pub async fn has_insufficient_feature_balance(
        &self,
        user_id: &EndUserId,
        feature: Feature,
    ) -> Result<bool, MeteringError> {
        self.has_insufficient_balance(user_id, &feature.denomination())
            .await
    }

    /// [`Metering::consume_one`] for a feature's denomination.
    ///
    /// # Errors
    ///
    /// See [`Metering::consume_one`].
    pub async fn consume_feature(
        &self,
        user_id: &EndUserId,
        feature: Feature,
    ) -> Result<Consumption, MeteringError> {
        self.consume_one(user_id, &feature.denomination()).await
    }

    /// Document chat gate.
    ///
    /// # Errors
    ///
    /// See [`Metering::check_balance`].
    pub async fn has_insufficient_docchat_balance(
        &self,
        user_id: &EndUserId,
    ) -> Result<bool, MeteringError> {
        self.has_insufficient_feature_balance(user_id, Feature::Chat)
            .await
    }

    /// Charge one document chat.
    ///
    /// # Errors
    ///
    /// See [`Metering::consume_one`].
    pub async fn consume_docchat(&self, user_id: &EndUserId) -> Result<Consumption, MeteringError> {
        self.consume_feature(user_id, Feature::Chat).await
    }

    /// AI tutor chat gate.
    ///
    /// # Errors
    ///
    /// See [`Metering::check_balance`].
    pub async fn has_insufficient_aitutor_chat_balance(
        &self,
        user_id: &EndUserId,
    ) -> Result<bool, MeteringError> {
        self.has_insufficient_feature_balance(user_id, Feature::TutorChat)
            .await
    }

    /// Charge one AI tutor chat.
    ///
    /// # Errors
    ///
    /// See [`Metering::consume_one`].
    pub async fn consume_aitutor_chat(
        &self,
        user_id: &EndUserId,
    ) -> Result<Consumption, MeteringError> {
        self.consume_feature(user_id, Feature::TutorChat).await
    }

    async fn customer_for(&self, user_id: &EndUserId) -> Result<ProviderCustomerId, MeteringError> {
        match self.resolver.resolve(user_id).await? {
            Some(customer_id) => Ok(customer_id),
            None => {
                tracing::warn!(user_id = %user_id, "User has no Fermata customer");
                Err(MeteringError::UnresolvedCustomer {
                    user_id: user_id.clone(),
                })
            }
        }
    }
}
