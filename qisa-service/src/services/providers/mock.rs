//! Mock provider implementation for testing.

use super::{
    ChatRequest, FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    Reply(String),
    Fail(String),
    Silent,
}

/// Mock text provider for testing.
///
/// Answers every request the same way and keeps a copy of each request it
/// receives, so tests can inspect the instruction that was sent.
pub struct MockTextProvider {
    behavior: Behavior,
    delay: Option<Duration>,
    requests: Mutex<Vec<(ChatRequest, GenerationParams)>>,
}

impl MockTextProvider {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    /// Always fail with an API error carrying `detail`.
    pub fn failing(detail: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(detail.into()))
    }

    /// Succeed without producing any text.
    pub fn silent() -> Self {
        Self::with_behavior(Behavior::Silent)
    }

    /// Wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn record(&self, request: &ChatRequest, params: &GenerationParams) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((request.clone(), params.clone()));
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<(ChatRequest, GenerationParams)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        request: &ChatRequest,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.record(request, params);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let text = match &self.behavior {
            Behavior::Reply(reply) => Some(reply.clone()),
            Behavior::Fail(detail) => return Err(ProviderError::ApiError(detail.clone())),
            Behavior::Silent => None,
        };

        Ok(ProviderResponse {
            text,
            input_tokens: i32::try_from(
                (request.instruction.len() + request.question.len()) / 4,
            )
            .unwrap_or(i32::MAX),
            output_tokens: 10,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            Behavior::Fail(detail) => Err(ProviderError::NotConfigured(detail.clone())),
            _ => Ok(()),
        }
    }
}
