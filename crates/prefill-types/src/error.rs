use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by the conversation loop and the one-shot ask.
///
/// None of these end a chat session; the loop reports them and keeps
/// awaiting input. `Config` is only raised before a session starts.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("completion service error: {0}")]
    Service(#[from] LlmError),

    #[error("response does not start with prefix '{prefix}'")]
    ContractViolation { prefix: String, response: String },

    #[error("invalid input: {0}")]
    Input(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_display() {
        let err = ChatError::ContractViolation {
            prefix: "X: ".to_string(),
            response: "hello".to_string(),
        };
        assert_eq!(err.to_string(), "response does not start with prefix 'X: '");
    }

    #[test]
    fn test_service_error_from_llm_error() {
        let err: ChatError = LlmError::Timeout.into();
        assert!(matches!(err, ChatError::Service(LlmError::Timeout)));
        assert!(err.to_string().contains("timed out"));
    }
}
