use thiserror::Error;

/// Failures of a completion call, classified by what the caller can do
/// about them.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The provider refused the credentials (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP 429. `retry_after` is in seconds when the provider sent it.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// The request itself was rejected (HTTP 400/413) or could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other non-success HTTP status.
    #[error("Provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a body that is not the expected JSON.
    #[error("Malformed provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LlmError {
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication(message.into())
    }

    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the same request may succeed later without changes.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
