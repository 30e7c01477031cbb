//! Metered resources.
//!
//! A [`Denomination`] names a usage pool at Fermata. The set is open: any
//! non-empty name can be metered without code changes. A [`Feature`] is a
//! product surface bound to one denomination.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::ids::IdError;

/// A named usage pool whose balance is tracked by Fermata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Denomination(Cow<'static, str>);

impl Denomination {
    /// Document chat pool.
    pub const DOCCHATS: Self = Self(Cow::Borrowed("docchats"));

    /// AI tutor (maths) chat pool.
    pub const AITUTORCHATS: Self = Self(Cow::Borrowed("aitutorchats"));

    /// Create a denomination from any name.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the name is empty or whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, IdError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IdError::Empty("Denomination"));
        }
        Ok(Self(Cow::Owned(name)))
    }

    /// Return the denomination name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Denomination {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Denomination {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Denomination> for String {
    fn from(d: Denomination) -> Self {
        d.0.into_owned()
    }
}

/// A metered product feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// Chat with an uploaded document.
    Chat,
    /// Chat with the AI maths tutor.
    TutorChat,
}

impl Feature {
    /// All metered features.
    pub const ALL: [Self; 2] = [Self::Chat, Self::TutorChat];

    /// The usage pool this feature draws from.
    #[must_use]
    pub const fn denomination(self) -> Denomination {
        match self {
            Self::Chat => Denomination::DOCCHATS,
            Self::TutorChat => Denomination::AITUTORCHATS,
        }
    }

    /// The feature's wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::TutorChat => "tutor-chat",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FeatureError::Unknown(s.to_string()))
    }
}

/// Errors that can occur when parsing a feature name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    /// No feature has this name.
    #[error("unknown feature: {0}")]
    Unknown(String),
}
