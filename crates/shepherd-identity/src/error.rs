//! Error types for identity lookups.

/// Result type for identity lookups.
pub type Result<T> = std::result::Result<T, LookupError>;

/// The identity store could not answer.
///
/// This is distinct from a missing record, which resolves to `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("identity store unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("identity store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("malformed identity store response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
