//! LlmProvider trait definition.
//!
//! This is the core abstraction that completion-service adapters implement.
//! Uses RPITIT for `complete` and `count_tokens`.

use prefill_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, TokenCount,
};

/// Trait for completion-service backends.
///
/// Implementations live in prefill-infra (e.g., `AnthropicProvider`).
///
/// # Prefix contract
///
/// When the last message of a request is a partial assistant message,
/// the returned `CompletionResponse::content` must start with that
/// message's content byte-for-byte, followed by the generated continuation.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Context and output limits of the configured model.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Estimate the tokens in a request without sending it.
    fn count_tokens(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<TokenCount, LlmError>> + Send;
}
