//! Transcript formatting helpers.
//!
//! Pure functions that shape conversation turns into the structures handed to
//! the language model or written to chat storage. Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Who produced a conversation turn.
///
/// Tags outside the four known roles (for example `tool`) are kept verbatim
/// in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt.
    System,
    /// The student.
    User,
    /// The tutor model.
    Assistant,
    /// A function call result.
    Function,
    /// Any other role tag.
    #[serde(untagged)]
    Other(String),
}

impl Role {
    /// The role tag as sent to the model.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Function => "function",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn.
    pub role: Role,
    /// Turn text. Function-call turns may carry none.
    pub content: Option<String>,
    /// Whether the problem was solved, as `"True"` / `"False"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_solved: Option<String>,
}

impl Turn {
    /// Create a turn with content and no solved marker.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            is_solved: None,
        }
    }
}

/// Build a turn record for the model, optionally tagged with a solved marker.
///
/// The marker uses the capitalized spelling the downstream prompt expects.
#[must_use]
pub fn wrap_for_downstream(role: Role, content: impl Into<String>, solved: Option<bool>) -> Turn {
    Turn {
        role,
        content: Some(content.into()),
        is_solved: solved.map(|s| if s { "True" } else { "False" }.to_string()),
    }
}

/// Return the most recent turn produced by a function call.
#[must_use]
pub fn find_last_function_turn(turns: &[Turn]) -> Option<&Turn> {
    turns.iter().rev().find(|t| t.role == Role::Function)
}

/// Append a `Student:` / `Tutor:` exchange to `history` and return it.
pub fn append_history_line<'a>(
    tutor: &str,
    student: &str,
    history: &'a mut Vec<String>,
) -> &'a mut Vec<String> {
    history.push(format!("Student: {student}\nTutor: {tutor}"));
    history
}

/// Flatten turns into a `role: content` script, one turn per line.
#[must_use]
pub fn render_conversation(turns: &[Turn]) -> String {
    let script = turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n");
    script.trim_end().to_string()
}

/// Turn the exact strings `"True"` and `"False"` into booleans.
///
/// Every other value, including other spellings and non-string values, is
/// returned unchanged.
#[must_use]
pub fn coerce_string_boolean(value: Value) -> Value {
    match value.as_str() {
        Some("True") => Value::Bool(true),
        Some("False") => Value::Bool(false),
        _ => value,
    }
}
