//! OpenAI-compatible provider implementation.
//!
//! [`OpenAiCompatProvider`] talks to any endpoint that accepts the OpenAI
//! chat completion format. The service defaults to Groq's endpoint, but
//! OpenAI, Together, OpenRouter and local servers work the same way.

use std::time::Duration;

use async_trait::async_trait;
use sift_types::config::ProviderSettings;
use sift_types::secret::SecretString;
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// An LLM provider that uses the OpenAI-compatible chat completion API.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: SecretString,
    http: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider for `base_url`, authenticating with `api_key`.
    ///
    /// `timeout` bounds each individual call; a call that exceeds it fails
    /// with [`ProviderError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] when the key is empty, and
    /// [`ProviderError::RequestFailed`] if the HTTP client cannot be built.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "API key is not set (GROQ_API_KEY or provider.api_key)".into(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("failed to build http client: {e}")))?;
        Ok(Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key,
            http,
        })
    }

    /// Build the provider from the service configuration.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        Self::new(
            provider_name(&settings.base_url),
            settings.base_url.clone(),
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs.max(1)),
        )
    }

    /// Returns the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

/// Derive a short log name from the endpoint host.
fn provider_name(base_url: &str) -> String {
    let host = base_url
        .split("://")
        .nth(1)
        .unwrap_or(base_url)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();
    if host.ends_with("groq.com") {
        "groq".into()
    } else if host.ends_with("openai.com") {
        "openai".into()
    } else if host.is_empty() {
        "openai-compat".into()
    } else {
        host.to_string()
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.completions_url();

        debug!(
            provider = %self.name,
            model = %request.model,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            if status.as_u16() == 429 {
                let header_ms = parse_retry_after_header(&response);
                let body = response.text().await.unwrap_or_default();

                // A 429 for exhausted credits will never clear on retry.
                if is_quota_exhausted(&body) {
                    let msg = extract_error_message(&body)
                        .unwrap_or_else(|| "quota exhausted".into());
                    warn!(provider = %self.name, "quota exhausted (not retryable)");
                    return Err(ProviderError::RequestFailed(msg));
                }

                let retry_ms = header_ms.or_else(|| parse_retry_after_ms(&body)).unwrap_or(0);
                warn!(provider = %self.name, retry_after_ms = retry_ms, "rate limited");
                return Err(ProviderError::RateLimited {
                    retry_after_ms: retry_ms,
                });
            }

            let body = response.text().await.unwrap_or_default();
            let detail = extract_error_message(&body).unwrap_or(body);

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthFailed(detail),
                404 => ProviderError::ModelNotFound(format!("model '{}': {detail}", request.model)),
                _ => ProviderError::RequestFailed(format!("HTTP {status}: {detail}")),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
            }
        })?;

        debug!(
            provider = %self.name,
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            "chat completion response received"
        );

        Ok(chat_response)
    }
}

/// Whether a 429 body describes exhausted credits rather than a rate limit.
///
/// Only the structured `error.code` / `error.type` is consulted; the
/// message text of an ordinary rate limit may mention billing pages.
fn is_quota_exhausted(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return false;
    };
    let Some(error) = value.get("error") else {
        return false;
    };
    ["code", "type"]
        .iter()
        .filter_map(|key| error.get(*key).and_then(|v| v.as_str()))
        .any(|tag| tag == "insufficient_quota")
}

/// Extract `error.message` (or a bare `error` string) from a JSON body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(String::from)
}

/// Read a numeric `Retry-After` (seconds, possibly fractional).
fn parse_retry_after_header(response: &reqwest::Response) -> Option<u64> {
    let raw = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())?;
    let secs = raw.trim().parse::<f64>().ok()?;
    Some((secs * 1000.0).max(0.0) as u64)
}

/// Read `retry_after_ms` or `retry_after` (seconds) from a JSON body.
fn parse_retry_after_ms(body: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("retry_after_ms")
        .and_then(|v| v.as_u64())
        .or_else(|| {
            value
                .get("retry_after")
                .and_then(|v| v.as_f64())
                .map(|secs| (secs * 1000.0) as u64)
        })
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            "test",
            base_url,
            SecretString::new("gsk_test_secret_123"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = OpenAiCompatProvider::new(
            "test",
            "https://api.example.com/v1",
            SecretString::default(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn from_settings_uses_groq_defaults() {
        let mut settings = ProviderSettings::default();
        settings.api_key = SecretString::new("gsk_abc");
        let provider = OpenAiCompatProvider::from_settings(&settings).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(
            provider.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn completions_url_strips_trailing_slash() {
        let p = provider("https://api.example.com/v1/");
        assert_eq!(p.completions_url(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn provider_name_from_host() {
        assert_eq!(provider_name("https://api.groq.com/openai/v1"), "groq");
        assert_eq!(provider_name("https://api.openai.com/v1"), "openai");
        assert_eq!(provider_name("http://127.0.0.1:8080/v1"), "127.0.0.1");
    }

    #[test]
    fn debug_hides_api_key() {
        let out = format!("{:?}", provider("https://api.example.com/v1"));
        assert!(!out.contains("gsk_test_secret_123"));
        assert!(out.contains("***"));
    }

    #[test]
    fn quota_bodies_are_detected() {
        assert!(is_quota_exhausted(r#"{"error":{"code":"insufficient_quota"}}"#));
        assert!(is_quota_exhausted(r#"{"error":{"type":"insufficient_quota","message":"x"}}"#));
        assert!(!is_quota_exhausted(r#"{"error":{"message":"Rate limit reached"}}"#));
    }

    #[test]
    fn groq_rate_limit_mentioning_billing_is_not_quota() {
        let body = r#"{"error":{"message":"Rate limit reached for model `llama-3.3-70b-versatile` on tokens per minute (TPM). Upgrade to Dev Tier today at https://console.groq.com/settings/billing","type":"tokens","code":"rate_limit_exceeded"}}"#;
        assert!(!is_quota_exhausted(body));
        assert!(!is_quota_exhausted("spending limit reached, see billing"));
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"Invalid API Key"}}"#).as_deref(),
            Some("Invalid API Key")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(extract_error_message("plain text"), None);
    }

    #[test]
    fn retry_after_from_body() {
        assert_eq!(parse_retry_after_ms(r#"{"retry_after_ms": 2500}"#), Some(2500));
        assert_eq!(parse_retry_after_ms(r#"{"retry_after": 1.5}"#), Some(1500));
        assert_eq!(parse_retry_after_ms("not json"), None);
    }
}
