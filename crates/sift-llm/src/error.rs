//! Provider error types for sift-llm.
//!
//! Only [`ProviderError::RateLimited`] is treated as transient; every other
//! variant is propagated to the caller without a retry.

use thiserror::Error;

/// Errors that can occur when calling the completion endpoint.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The HTTP request failed or the endpoint returned a non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Authentication was rejected (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The endpoint asked us to slow down (HTTP 429).
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait time before retrying, in milliseconds.
        retry_after_ms: u64,
    },

    /// The requested model does not exist on the endpoint.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The provider cannot be used (e.g. missing API key).
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The endpoint answered with something that is not a usable completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The call exceeded the configured per-call timeout.
    #[error("timeout")]
    Timeout,

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Whether this error is the transient rate-limit signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::RequestFailed(err.to_string())
        }
    }
}

/// A convenience type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
