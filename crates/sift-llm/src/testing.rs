//! Scripted provider for tests.
//!
//! [`ScriptedProvider`] either replays a queue of canned outcomes in call
//! order, or answers through a closure that inspects the request. Every
//! request it sees is recorded so tests can assert on prompts and sampling
//! options.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

type Responder = Box<dyn Fn(&ChatRequest) -> Result<String> + Send + Sync>;

/// A provider double that returns scripted text or errors.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<String>>>,
    responder: Option<Responder>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// An empty script. Calls beyond the script fail with
    /// [`ProviderError::RequestFailed`].
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `respond(request)` instead of a queue.
    pub fn with_responder<F>(respond: F) -> Self
    where
        F: Fn(&ChatRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(respond)),
            ..Self::new()
        }
    }

    /// Queue a successful completion.
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn then_err(self, err: ProviderError) -> Self {
        self.push(Err(err));
        self
    }

    fn push(&self, outcome: Result<String>) {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let outcome = match &self.responder {
            Some(respond) => respond(request),
            None => self
                .queue
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::RequestFailed("script exhausted".into()))),
        };

        outcome.map(|text| ChatResponse::from_text(&request.model, text))
    }
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("calls", &self.call_count())
            .finish()
    }
}
