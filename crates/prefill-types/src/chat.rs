//! Conversation domain types: turns, transcripts, speaker rosters, and the
//! loop state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::llm::{Message, MessageRole};

/// The input line that ends a chat session.
pub const QUIT_SENTINEL: &str = "quit";

/// One turn of a conversation.
///
/// `is_partial` is only meaningful for assistant turns and is only ever set
/// on the synthetic prefix turn of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub text: String,
    #[serde(default)]
    pub is_partial: bool,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            is_partial: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            is_partial: false,
        }
    }

    pub fn to_message(&self) -> Message {
        Message {
            role: self.role,
            content: self.text.clone(),
            partial: self.is_partial,
        }
    }
}

/// Ordered, append-only history of a session.
///
/// Only complete turns are stored; the partial prefix turn exists in the
/// outgoing request and nowhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Messages for an outgoing request: every stored turn, followed by a
    /// partial assistant turn holding `prefix` when it is non-empty.
    pub fn request_messages(&self, prefix: &str) -> Vec<Message> {
        let mut messages: Vec<Message> = self.turns.iter().map(Turn::to_message).collect();
        if !prefix.is_empty() {
            messages.push(Message::prefill(prefix));
        }
        messages
    }
}

/// Identity labels used to build roleplay prefixes.
///
/// Always non-empty; names are trimmed and blank names rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SpeakerRoster {
    names: Vec<String>,
}

impl SpeakerRoster {
    pub fn new<I, S>(names: I) -> Result<Self, ChatError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(ChatError::Config("speaker names must not be blank".to_string()));
            }
            if !collected.contains(&name) {
                collected.push(name);
            }
        }
        if collected.is_empty() {
            return Err(ChatError::Config("speaker roster must not be empty".to_string()));
        }
        Ok(Self { names: collected })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for SpeakerRoster {
    type Error = ChatError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpeakerRoster> for Vec<String> {
    fn from(value: SpeakerRoster) -> Self {
        value.names
    }
}

/// States of the conversation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    AwaitingInput,
    RequestInFlight,
    Terminated,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::AwaitingInput => write!(f, "awaiting_input"),
            LoopState::RequestInFlight => write!(f, "request_in_flight"),
            LoopState::Terminated => write!(f, "terminated"),
        }
    }
}
