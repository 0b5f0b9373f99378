//! AnthropicProvider -- concrete [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends requests to the Anthropic Messages API (`/v1/messages`) with
//! proper authentication headers.
//!
//! A partial assistant message is sent as the final `assistant` message.
//! The API returns only the continuation, so the prefix is joined back on
//! to honour the prefix contract of [`LlmProvider`].
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use prefill_core::llm::provider::LlmProvider;
use prefill_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, ProviderCapabilities,
    StopReason, TokenCount, Usage,
};

use super::types::{AnthropicMessage, AnthropicRequest, AnthropicResponse, ErrorPayload};

/// Anthropic Claude LLM provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    pub const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";

    /// Create a new Anthropic provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "claude-sonnet-4-20250514")
    /// * `timeout` - Whole-request timeout; expiry maps to [`LlmError::Timeout`]
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let capabilities = Self::capabilities_for_model(&model);

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
            capabilities,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Determine capabilities based on model name.
    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        if model.contains("opus") {
            ProviderCapabilities {
                max_context_tokens: 200_000,
                max_output_tokens: 32_000,
            }
        } else if model.contains("sonnet") || model.contains("haiku") {
            ProviderCapabilities {
                max_context_tokens: 200_000,
                max_output_tokens: 8_192,
            }
        } else {
            // Conservative defaults for unknown models
            ProviderCapabilities {
                max_context_tokens: 200_000,
                max_output_tokens: 4_096,
            }
        }
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    ///
    /// The API rejects a final assistant message that ends in whitespace, so
    /// a partial prefix is sent with trailing whitespace trimmed, and dropped
    /// entirely when nothing is left.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let last = request.messages.len().saturating_sub(1);
        let messages = request
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role != MessageRole::System)
            .filter_map(|(i, m)| {
                let content = if m.partial && i == last {
                    m.content.trim_end()
                } else {
                    m.content.as_str()
                };
                if m.partial && content.is_empty() {
                    return None;
                }
                Some(AnthropicMessage {
                    role: m.role.to_string(),
                    content: content.to_string(),
                })
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens.min(self.capabilities.max_output_tokens),
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
        }
    }

    fn map_status(status: reqwest::StatusCode, retry_after: Option<u64>, body: String) -> LlmError {
        let message = serde_json::from_str::<ErrorPayload>(&body)
            .map(|p| p.error.message)
            .unwrap_or(body);
        match status.as_u16() {
            400 => LlmError::InvalidRequest(message),
            401 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited {
                retry_after_ms: retry_after.map(|secs| secs.saturating_mul(1000)),
            },
            529 => LlmError::Overloaded(message),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

/// Rebuild the full assistant turn from the prefix and the API continuation.
///
/// When trailing whitespace was trimmed from the sent prefix, the model
/// usually restores it at the start of the continuation; the original
/// prefix is kept and the continuation's leading whitespace dropped.
pub fn join_prefill(prefix: &str, continuation: &str) -> String {
    if prefix.trim_end().len() == prefix.len() {
        format!("{prefix}{continuation}")
    } else {
        format!("{prefix}{}", continuation.trim_start())
    }
}

fn parse_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    }
}

// No Debug derive: keeps the client and key out of any formatted output.

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        debug!(
            messages = body.messages.len(),
            prefilled = request.prefill().is_some(),
            "POST {url}"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, retry_after, error_body));
        }

        let anthropic_resp: AnthropicResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        let continuation = anthropic_resp.text();
        let content = match request.prefill() {
            Some(prefix) => join_prefill(prefix, &continuation),
            None => continuation,
        };

        Ok(CompletionResponse {
            id: anthropic_resp.id,
            content,
            model: anthropic_resp.model,
            stop_reason: parse_stop_reason(anthropic_resp.stop_reason.as_deref()),
            usage: Usage {
                input_tokens: anthropic_resp.usage.input_tokens,
                output_tokens: anthropic_resp.usage.output_tokens,
            },
        })
    }

    async fn count_tokens(&self, request: &CompletionRequest) -> Result<TokenCount, LlmError> {
        // Rough estimate: ~4 chars per token for English text.
        let mut total_chars: usize = 0;

        if let Some(system) = &request.system {
            total_chars += system.len();
        }

        for msg in &request.messages {
            // Role and message structure overhead
            total_chars += msg.content.len() + 10;
        }

        let estimated_tokens = (total_chars as f64 / 4.0).ceil() as u32;

        Ok(TokenCount {
            input_tokens: estimated_tokens,
        })
    }
}
