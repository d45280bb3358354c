//! Client error types.

/// Errors that can occur when using the point client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the request; no state changed.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Server-provided reason.
        message: String,
    },

    /// The use exceeded the balance; no state changed.
    #[error("insufficient points: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// The service failed to persist the mutation and rolled it back.
    #[error("persistence failure: {message}")]
    PersistenceFailure {
        /// Server-provided message.
        message: String,
    },

    /// Server returned any other error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Check if the service rejected the request before any write.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::InsufficientBalance { .. }
        )
    }
}
