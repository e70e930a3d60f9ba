//! The [`Provider`] trait: the single capability the pipeline needs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// Something that can turn a chat request into a completion.
///
/// The production implementation is
/// [`OpenAiCompatProvider`](crate::openai_compat::OpenAiCompatProvider);
/// tests substitute a scripted double that returns canned text or
/// simulated rate-limit errors.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name used in log fields (e.g. "groq").
    fn name(&self) -> &str;

    /// Execute a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::RateLimited`](crate::error::ProviderError::RateLimited)
    /// when the endpoint asks the caller to back off, and another
    /// [`ProviderError`](crate::error::ProviderError) variant for every
    /// other failure.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        (**self).complete(request).await
    }
}
