//! Metering outcomes.
//!
//! Fermata failures do not fail the request. They surface as explicit
//! variants so callers can tell an exhausted balance from a degraded provider,
//! while the legacy boolean / integer views stay one method call away.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the balance gate does when Fermata cannot be consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Deny the metered action.
    #[default]
    Closed,
    /// Allow the metered action.
    Open,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::Open => f.write_str("open"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed" => Ok(Self::Closed),
            "open" => Ok(Self::Open),
            other => Err(format!("unknown failure policy: {other}")),
        }
    }
}

/// Result of a balance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceCheck {
    /// At least one unit remains.
    Available(i64),
    /// The balance is below one unit.
    Exhausted(i64),
    /// Fermata reported no balance (no record, or balance unknown).
    NoRecord,
    /// Fermata could not be consulted.
    Unavailable {
        /// Diagnostic description of the failure.
        reason: String,
    },
}

impl BalanceCheck {
    /// Classify a balance read.
    #[must_use]
    pub fn from_balance(balance: Option<i64>) -> Self {
        match balance {
            Some(amount) if amount >= 1 => Self::Available(amount),
            Some(amount) => Self::Exhausted(amount),
            None => Self::NoRecord,
        }
    }

    /// Whether the metered action must be denied.
    ///
    /// True when the balance is absent or below one, and for
    /// [`BalanceCheck::Unavailable`] under [`FailurePolicy::Closed`].
    #[must_use]
    pub fn is_insufficient(&self, policy: FailurePolicy) -> bool {
        match self {
            Self::Available(_) => false,
            Self::Exhausted(_) | Self::NoRecord => true,
            Self::Unavailable { .. } => policy == FailurePolicy::Closed,
        }
    }

    /// The balance, when Fermata reported one.
    #[must_use]
    pub fn balance(&self) -> Option<i64> {
        match self {
            Self::Available(amount) | Self::Exhausted(amount) => Some(*amount),
            Self::NoRecord | Self::Unavailable { .. } => None,
        }
    }

    /// Short machine-readable label.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Available(_) => "available",
            Self::Exhausted(_) => "exhausted",
            Self::NoRecord => "no_record",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// Result of consuming units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumption {
    /// The event was recorded; Fermata reported the new balance.
    Recorded {
        /// Post-event balance.
        balance: i64,
    },
    /// The event was recorded but no balance came back.
    RecordedWithoutBalance,
    /// Fermata rejected the event or could not be reached.
    Failed {
        /// Diagnostic description of the failure.
        reason: String,
    },
}

impl Consumption {
    /// The new balance, or `0` when none is known.
    #[must_use]
    pub fn balance(&self) -> i64 {
        match self {
            Self::Recorded { balance } => *balance,
            Self::RecordedWithoutBalance | Self::Failed { .. } => 0,
        }
    }

    /// Whether Fermata accepted the event.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Short machine-readable label.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Recorded { .. } => "recorded",
            Self::RecordedWithoutBalance => "recorded_without_balance",
            Self::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_iff_absent_or_below_one() {
        for amount in [-5, -1, 0] {
            let check = BalanceCheck::from_balance(Some(amount));
            assert!(check.is_insufficient(FailurePolicy::Closed), "{amount}");
            assert!(check.is_insufficient(FailurePolicy::Open), "{amount}");
        }
        for amount in [1, 2, 100, i64::MAX] {
            let check = BalanceCheck::from_balance(Some(amount));
            assert!(!check.is_insufficient(FailurePolicy::Closed), "{amount}");
        }
        assert!(BalanceCheck::from_balance(None).is_insufficient(FailurePolicy::Open));
    }

    #[test]
    fn unavailable_follows_policy() {
        let check = BalanceCheck::Unavailable {
            reason: "timeout".into(),
        };
        assert!(check.is_insufficient(FailurePolicy::Closed));
        assert!(!check.is_insufficient(FailurePolicy::Open));
        assert_eq!(check.balance(), None);
    }

    #[test]
    fn consumption_balance_view() {
        assert_eq!(Consumption::Recorded { balance: 9 }.balance(), 9);
        assert_eq!(Consumption::RecordedWithoutBalance.balance(), 0);
        let failed = Consumption::Failed {
            reason: "503".into(),
        };
        assert_eq!(failed.balance(), 0);
        assert!(!failed.is_recorded());
        assert!(Consumption::RecordedWithoutBalance.is_recorded());
    }

    #[test]
    fn failure_policy_parsing() {
        assert_eq!("closed".parse::<FailurePolicy>(), Ok(FailurePolicy::Closed));
        assert_eq!(" OPEN ".parse::<FailurePolicy>(), Ok(FailurePolicy::Open));
        assert!("maybe".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Closed);
    }
}
