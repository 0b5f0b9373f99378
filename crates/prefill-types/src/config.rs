//! Configuration types for Prefill.
//!
//! `FileConfig` represents `config.toml`; every field has a default so a
//! missing or partial file is fine. `ChatConfig` is the validated
//! configuration a conversation loop is started with.

use serde::{Deserialize, Serialize};

use crate::chat::SpeakerRoster;
use crate::error::ChatError;

/// Model used when neither the config file nor the CLI names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Top-level contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on generated tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f64>,

    /// System instruction sent with every request.
    #[serde(default)]
    pub system: Option<String>,

    /// Static reply prefix, used when no speakers are configured.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Roleplay identities; one is picked per reply.
    #[serde(default)]
    pub speakers: Vec<String>,

    /// Override the completion service base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            system: None,
            prefix: None,
            speakers: Vec::new(),
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl FileConfig {
    /// Build the validated chat configuration from these settings.
    pub fn to_chat_config(&self) -> Result<ChatConfig, ChatError> {
        let speakers = if self.speakers.is_empty() {
            None
        } else {
            Some(SpeakerRoster::new(self.speakers.iter().cloned())?)
        };

        let config = ChatConfig {
            model: self.model.clone(),
            max_response_tokens: self.max_tokens,
            temperature: self.temperature,
            system_instruction: self.system.clone().filter(|s| !s.trim().is_empty()),
            speakers,
            static_prefix: self.prefix.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration a conversation loop is started with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub model: String,
    pub max_response_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub system_instruction: Option<String>,
    #[serde(default)]
    pub speakers: Option<SpeakerRoster>,
    /// Prefix used when `speakers` is `None`.
    #[serde(default)]
    pub static_prefix: Option<String>,
}

impl ChatConfig {
    pub fn new(model: impl Into<String>, max_response_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_response_tokens,
            temperature: None,
            system_instruction: None,
            speakers: None,
            static_prefix: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }

    pub fn with_speakers(mut self, speakers: SpeakerRoster) -> Self {
        self.speakers = Some(speakers);
        self
    }

    pub fn with_static_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.static_prefix = Some(prefix.into());
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.model.trim().is_empty() {
            return Err(ChatError::Config("model must not be empty".to_string()));
        }
        if self.max_response_tokens == 0 {
            return Err(ChatError::Config(
                "max_response_tokens must be positive".to_string(),
            ));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=1.0).contains(&t) {
                return Err(ChatError::Config(format!(
                    "temperature must be between 0.0 and 1.0, got {t}"
                )));
            }
        }
        Ok(())
    }
}
