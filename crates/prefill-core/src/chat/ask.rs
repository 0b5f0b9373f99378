//! One-shot prefixed completion.
//!
//! A single prompt, an optional system instruction, and an optional reply
//! prefix. Used for the non-interactive demos: forcing an output language,
//! skipping preambles, or pinning a reply format.

use tracing::{Instrument, info_span};

use prefill_types::chat::Transcript;
use prefill_types::config::ChatConfig;
use prefill_types::error::ChatError;
use prefill_types::llm::{CompletionRequest, Usage};

use crate::llm::box_provider::BoxLlmProvider;

use super::prefix::displayed_reply;

/// Result of a one-shot ask.
#[derive(Debug)]
pub struct AskOutcome {
    pub prefix: String,
    pub full_text: String,
    pub displayed: String,
    pub usage: Usage,
    /// Set when the service ignored the prefix; `displayed` is then the
    /// full text.
    pub violation: Option<ChatError>,
}

/// Send `prompt` with `prefix` as the start of the reply.
///
/// The configured roster is not used here; pass a speaker prefix
/// explicitly if one is wanted.
pub async fn ask(
    provider: &BoxLlmProvider,
    config: &ChatConfig,
    prompt: &str,
    prefix: &str,
) -> Result<AskOutcome, ChatError> {
    config.validate()?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ChatError::Input("prompt must not be empty".to_string()));
    }

    let mut transcript = Transcript::new();
    transcript.push_user(prompt);

    let request = CompletionRequest {
        model: config.model.clone(),
        messages: transcript.request_messages(prefix),
        system: config.system_instruction.clone(),
        max_tokens: config.max_response_tokens,
        temperature: config.temperature,
    };

    let span = info_span!(
        "gen_ai.ask",
        gen_ai.system = provider.name(),
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = request.max_tokens,
    );
    let response = provider.complete(&request).instrument(span).await?;

    let (displayed, violation) = displayed_reply(&response.content, prefix);
    Ok(AskOutcome {
        prefix: prefix.to_string(),
        full_text: response.content,
        displayed,
        usage: response.usage,
        violation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{MockProvider, Scripted};
    use prefill_types::llm::LlmError;

    fn provider(script: Vec<Scripted>) -> (BoxLlmProvider, std::sync::Arc<std::sync::Mutex<Vec<CompletionRequest>>>) {
        let (mock, requests) = MockProvider::new(script);
        (BoxLlmProvider::new(mock), requests)
    }

    #[tokio::test]
    async fn test_ask_strips_prefix() {
        let (provider, requests) = provider(vec![Scripted::text("{\"name\": \"Ada\"}")]);
        let config = ChatConfig::new("test-model", 100);

        let outcome = ask(&provider, &config, "Extract the name as JSON", "{")
            .await
            .unwrap();
        assert_eq!(outcome.displayed, "\"name\": \"Ada\"}");
        assert_eq!(outcome.full_text, "{\"name\": \"Ada\"}");
        assert!(outcome.violation.is_none());

        let sent = requests.lock().unwrap();
        assert_eq!(sent[0].messages.len(), 2);
        assert_eq!(sent[0].prefill(), Some("{"));
    }

    #[tokio::test]
    async fn test_ask_reports_violation() {
        let (provider, _) = provider(vec![Scripted::text("Sure! Here it is.")]);
        let config = ChatConfig::new("test-model", 100);

        let outcome = ask(&provider, &config, "Hi", "Oui").await.unwrap();
        assert_eq!(outcome.displayed, "Sure! Here it is.");
        assert!(matches!(outcome.violation, Some(ChatError::ContractViolation { .. })));
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_prompt() {
        let (provider, requests) = provider(vec![]);
        let config = ChatConfig::new("test-model", 100);

        let err = ask(&provider, &config, "  ", "").await.unwrap_err();
        assert!(matches!(err, ChatError::Input(_)));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ask_propagates_service_error() {
        let (provider, _) = provider(vec![Scripted::Timeout]);
        let config = ChatConfig::new("test-model", 100);

        let err = ask(&provider, &config, "Hi", "").await.unwrap_err();
        assert!(matches!(err, ChatError::Service(LlmError::Timeout)));
    }
}
