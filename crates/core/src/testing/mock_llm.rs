//! Mock LLM client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::titles::{CompletionRequest, LlmClient, LlmError};

/// Mock implementation of the LlmClient trait.
///
/// Returns a configured response string and records every request so
/// tests can assert on prompts and call counts.
#[derive(Default)]
pub struct MockLlm {
    response: Arc<RwLock<String>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
    next_error: Arc<RwLock<Option<LlmError>>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text returned by subsequent completions.
    pub async fn set_response(&self, response: impl Into<String>) {
        *self.response.write().await = response.into();
    }

    /// Configure the next completion to fail.
    pub async fn set_next_error(&self, error: LlmError) {
        *self.next_error.write().await = Some(error);
    }

    /// Requests passed to `complete`, in call order.
    pub async fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().await.clone()
    }

    /// Number of completions performed.
    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }

    async fn take_error(&self) -> Option<LlmError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.requests.write().await.push(request);
        Ok(self.response.read().await.clone())
    }
}
