//! Text-completion capability for sift.
//!
//! The feedback pipeline needs exactly one thing from its environment: a
//! function that takes a prompt plus sampling options and returns text or
//! an error. This crate defines that capability and its production
//! implementation.
//!
//! # Architecture
//!
//! - [`Provider`] trait defines the chat completion interface
//! - [`OpenAiCompatProvider`] implements it for any OpenAI-compatible API (Groq by default)
//! - [`RetryPolicy`] wraps a provider with bounded exponential backoff on rate limiting
//! - [`with_retry`] applies the same policy to an arbitrary async operation
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sift_llm::{ChatMessage, ChatRequest, OpenAiCompatProvider, Provider, RetryConfig, RetryPolicy};
//!
//! let provider = OpenAiCompatProvider::from_settings(&config.provider)?;
//! let provider = RetryPolicy::new(provider, RetryConfig::default());
//!
//! let request = ChatRequest::new("llama-3.3-70b-versatile", vec![ChatMessage::user("Hi")])
//!     .with_temperature(0.0)
//!     .with_max_tokens(256);
//! let text = provider.complete(&request).await?.into_text()?;
//! ```

pub mod error;
pub mod openai_compat;
pub mod provider;
pub mod retry;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;

pub use error::{ProviderError, Result};
pub use openai_compat::OpenAiCompatProvider;
pub use provider::Provider;
pub use retry::{RetryConfig, RetryPolicy, with_retry};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, Usage};
