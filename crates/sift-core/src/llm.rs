//! The completion handle shared by every pipeline stage.
//!
//! [`Llm`] binds a [`Provider`] to a model identifier and a retry policy,
//! and exposes the one operation the pipeline needs: prompt in, text out.

use std::sync::Arc;

use sift_llm::{ChatMessage, ChatRequest, Provider, ProviderError, RetryConfig, with_retry};
use tracing::debug;

/// Sampling options for one kind of call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Sampling {
    /// Per-item classification: deterministic, small JSON answer.
    pub const CLASSIFY: Sampling = Sampling {
        temperature: 0.0,
        max_tokens: 256,
    };

    /// Aggregate analysis: deterministic, room for a prose summary.
    pub const ANALYZE: Sampling = Sampling {
        temperature: 0.0,
        max_tokens: 1000,
    };

    /// Action steps: slight variation in phrasing is welcome.
    pub const ACTIONS: Sampling = Sampling {
        temperature: 0.3,
        max_tokens: 300,
    };
}

/// A provider bound to a model and a retry policy.
#[derive(Clone)]
pub struct Llm {
    provider: Arc<dyn Provider>,
    model: String,
    retry: RetryConfig,
}

impl Llm {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            provider,
            model: model.into(),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and return the completion.
    ///
    /// Rate-limited calls are retried with backoff; every other failure,
    /// including a response without choices, is returned as is.
    pub async fn complete(
        &self,
        prompt: &str,
        sampling: Sampling,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest::new(self.model.clone(), vec![ChatMessage::user(prompt)])
            .with_temperature(sampling.temperature)
            .with_max_tokens(sampling.max_tokens);

        let response = with_retry(&self.retry, self.provider.name(), || {
            self.provider.complete(&request)
        })
        .await?;

        let text = response.into_text()?;
        debug!(
            provider = %self.provider.name(),
            chars = text.len(),
            "completion received"
        );
        Ok(text)
    }
}

impl std::fmt::Debug for Llm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Llm")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("retry", &self.retry)
            .finish()
    }
}
