//! Scripted provider shared by the chat tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use prefill_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason,
    TokenCount, Usage,
};

use crate::llm::provider::LlmProvider;

/// One scripted provider answer.
#[derive(Clone)]
pub enum Scripted {
    Text(String),
    Timeout,
    Provider(String),
}

impl Scripted {
    pub fn text(s: &str) -> Self {
        Scripted::Text(s.to_string())
    }
}

/// Provider returning scripted answers in order and recording every request.
///
/// Answers `Timeout` once the script runs out.
pub struct MockProvider {
    script: Mutex<VecDeque<Scripted>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
}

impl MockProvider {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> (Self, Arc<Mutex<Vec<CompletionRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Arc::clone(&requests),
            capabilities: ProviderCapabilities {
                max_context_tokens: 200_000,
                max_output_tokens: 8_192,
            },
        };
        (provider, requests)
    }

    pub fn with_context_limit(mut self, max_context_tokens: u32) -> Self {
        self.capabilities.max_context_tokens = max_context_tokens;
        self
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Text(content)) => Ok(CompletionResponse {
                id: "msg_mock".to_string(),
                content,
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage {
                    input_tokens: 12,
                    output_tokens: 5,
                },
            }),
            Some(Scripted::Provider(message)) => Err(LlmError::Provider { message }),
            Some(Scripted::Timeout) | None => Err(LlmError::Timeout),
        }
    }

    async fn count_tokens(&self, _request: &CompletionRequest) -> Result<TokenCount, LlmError> {
        Ok(TokenCount { input_tokens: 10 })
    }
}
