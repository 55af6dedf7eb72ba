//! Scripted LLM for tests and offline development.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use memoir_core::error::{MemoirError, MemoirResult};
use memoir_core::traits::{GenerationOptions, Llm, LlmResponse};
use memoir_core::types::Message;

/// Deterministic mock provider.
///
/// Replays queued responses in order; once the queue is empty it falls
/// back to a fixed response if one was configured, otherwise errors.
pub struct MockLlm {
    responses: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Mock that replays `responses` in order, then errors.
    pub fn queued<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            fallback: None,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that returns the same response for every call.
    pub fn always(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Some(response.into()),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: None,
            failure: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Llm for MockLlm {
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> MemoirResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(MemoirError::llm(message.clone()));
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(content) => Ok(LlmResponse {
                content: Some(content),
                usage: None,
            }),
            None => Err(MemoirError::llm("MockLlm ran out of queued responses")),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
