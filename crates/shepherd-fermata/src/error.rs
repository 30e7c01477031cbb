//! Fermata client error types.

/// Errors that can occur when calling Fermata.
#[derive(Debug, thiserror::Error)]
pub enum FermataError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Balance read answered with a non-success, non-5xx status.
    #[error("balance fetch failed: {status} - {body}")]
    BalanceFetch {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Usage event was rejected.
    #[error("event push failed: {status} - {body}")]
    EventPush {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
