//! Request and response types for chat completion calls.
//!
//! These mirror the OpenAI chat completion wire format, which Groq and most
//! hosted model APIs accept.

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author ("system", "user", "assistant").
    pub role: String,

    /// The content of the message. Some providers send `null` here.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// A chat completion request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    /// The model identifier (e.g. "llama-3.3-70b-versatile").
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a minimal chat request with a model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Concatenated content of every user message. Handy for logging and
    /// for test doubles that answer based on the prompt.
    pub fn user_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A chat completion response (OpenAI format).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,

    pub choices: Vec<Choice>,

    #[serde(default)]
    pub usage: Option<Usage>,

    #[serde(default)]
    pub model: String,
}

impl ChatResponse {
    /// Build a single-choice response. Used by test doubles.
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage::assistant(text),
                finish_reason: Some("stop".into()),
            }],
            usage: None,
            model: model.into(),
        }
    }

    /// The text of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidResponse`] when the response has no
    /// choices at all.
    pub fn text(&self) -> Result<&str> {
        self.choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".into()))
    }

    /// Consume the response and return the first choice's text.
    pub fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".into()))
    }
}

/// A single completion choice within a response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,

    pub message: ChatMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics for a completion request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
