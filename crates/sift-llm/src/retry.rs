//! Exponential backoff retry for completion calls.
//!
//! Only rate limiting is treated as transient. Any other failure is handed
//! straight back to the caller: a bad key, a missing model, or a malformed
//! body will not get better by asking again.
//!
//! [`with_retry`] applies the policy to any async operation;
//! [`RetryPolicy`] wraps a [`Provider`] so every `complete` call goes
//! through it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sift_types::config::PipelineSettings;
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, counting the first one (default: 5).
    /// A value of 0 is treated as 1.
    pub max_retries: u32,
    /// Delay before the first retry (default: 1 second). Doubles each time.
    pub base_delay: Duration,
    /// Ceiling for a single delay, including provider-suggested waits
    /// (default: 60 seconds).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl From<&PipelineSettings> for RetryConfig {
    fn from(settings: &PipelineSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            ..Self::default()
        }
    }
}

/// Delay before retry number `retry` (0-indexed): `base_delay * 2^retry`,
/// capped at `max_delay`.
pub fn compute_delay(config: &RetryConfig, retry: u32) -> Duration {
    let factor = 2u64.saturating_pow(retry);
    let base_ms = config.base_delay.as_millis() as u64;
    let capped_ms = base_ms
        .saturating_mul(factor)
        .min(config.max_delay.as_millis() as u64);
    Duration::from_millis(capped_ms)
}

/// Run `operation`, retrying on [`ProviderError::RateLimited`] with
/// exponential backoff.
///
/// - Success returns immediately, without any delay.
/// - A rate-limit error sleeps and retries until `max_retries` attempts
///   have been made, then the last error is returned.
/// - Any other error is returned after the first attempt.
///
/// When the provider suggests a longer wait than the computed backoff, the
/// suggestion wins (still bounded by `max_delay`).
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_retries.max(1);
    let mut attempt = 1;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(provider = %label, attempt, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let ProviderError::RateLimited { retry_after_ms } = &err else {
            return Err(err);
        };

        if attempt >= max_attempts {
            warn!(
                provider = %label,
                attempts = attempt,
                "rate limited on every attempt, giving up"
            );
            return Err(err);
        }

        let suggested = Duration::from_millis(*retry_after_ms).min(config.max_delay);
        let delay = compute_delay(config, attempt - 1).max(suggested);

        warn!(
            provider = %label,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "rate limited, backing off"
        );

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// A provider wrapper that retries rate-limited calls.
///
/// ```rust,ignore
/// let provider = RetryPolicy::new(OpenAiCompatProvider::from_settings(&cfg.provider)?, RetryConfig::default());
/// ```
pub struct RetryPolicy<P> {
    inner: P,
    config: RetryConfig,
}

impl<P: Provider> RetryPolicy<P> {
    pub fn new(inner: P, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: Provider> Provider for RetryPolicy<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        with_retry(&self.config, self.inner.name(), || self.inner.complete(request)).await
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for RetryPolicy<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}
