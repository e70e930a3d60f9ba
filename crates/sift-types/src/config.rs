//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`. Unknown fields are silently ignored so older
//! binaries keep loading newer config files.
//!
//! The configuration is constructed once at process start and handed to
//! every component that needs it; nothing below the binary reads the
//! environment.

use serde::{Deserialize, Serialize};

use crate::secret::SecretString;

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for the sift service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider credentials and model selection.
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Retry and concurrency knobs for the report pipeline.
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// HTTP server settings.
    #[serde(default)]
    pub gateway: GatewaySettings,
}

// ── Provider ─────────────────────────────────────────────────────────────

/// Connection settings for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API key sent as a bearer token.
    #[serde(default, alias = "apiKey")]
    pub api_key: SecretString,

    /// Model identifier passed through on every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat completion API.
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs", alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}
fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: SecretString::default(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// Knobs for the feedback processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Upper bound on the number of attempts for one LLM call when the
    /// provider keeps rate limiting.
    #[serde(default = "default_max_retries", alias = "maxRetries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubled after every retry.
    #[serde(default = "default_base_delay_ms", alias = "baseDelayMs")]
    pub base_delay_ms: u64,

    /// How many feedback items may be classified at the same time.
    /// `1` classifies strictly one after another.
    #[serde(default = "default_classify_concurrency", alias = "classifyConcurrency")]
    pub classify_concurrency: usize,
}

fn default_max_retries() -> u32 {
    5
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_classify_concurrency() -> usize {
    4
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            classify_concurrency: default_classify_concurrency(),
        }
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default, alias = "corsOrigins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}
