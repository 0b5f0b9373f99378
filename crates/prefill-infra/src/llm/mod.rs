//! LLM provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait
//! defined in `prefill-core` for Anthropic Claude, and a factory
//! ([`create_provider`]) that builds it from the loaded configuration.
//!
//! [`LlmProvider`]: prefill_core::llm::provider::LlmProvider

pub mod anthropic;

use std::time::Duration;

use secrecy::SecretString;

use prefill_core::llm::box_provider::BoxLlmProvider;
use prefill_types::config::FileConfig;
use prefill_types::llm::LlmError;

use self::anthropic::AnthropicProvider;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Create a [`BoxLlmProvider`] from the loaded configuration.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is given, or
/// a provider error if the HTTP client cannot be built.
pub fn create_provider(
    config: &FileConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
    let timeout = Duration::from_secs(config.request_timeout_secs.max(1));

    let mut provider = AnthropicProvider::new(key, config.model.clone(), timeout)?;
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(BoxLlmProvider::new(provider))
}

/// Read the API key from [`API_KEY_ENV`], ignoring blank values.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_anthropic() {
        let config = FileConfig::default();
        let provider = create_provider(&config, Some(SecretString::from("sk-test-key"))).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_create_provider_without_key_fails() {
        let config = FileConfig::default();
        let result = create_provider(&config, None);
        assert!(matches!(result, Err(LlmError::AuthenticationFailed)));
    }

    #[test]
    fn test_create_provider_with_base_url() {
        let config = FileConfig {
            base_url: Some("http://localhost:9999".to_string()),
            request_timeout_secs: 0,
            ..FileConfig::default()
        };
        assert!(create_provider(&config, Some(SecretString::from("k"))).is_ok());
    }
}
