//! The conversation loop state machine.
//!
//! `ConversationLoop` owns the transcript for the lifetime of a session.
//! Each input line moves it `AwaitingInput -> RequestInFlight ->
//! AwaitingInput`, or to `Terminated` on the quit sentinel or end of input.
//! Nothing is printed here; every step yields a [`TurnOutcome`] for the
//! caller to render.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, debug, info_span, warn};

use prefill_types::chat::{LoopState, QUIT_SENTINEL, Transcript};
use prefill_types::config::ChatConfig;
use prefill_types::error::ChatError;
use prefill_types::llm::{CompletionRequest, StopReason, Usage};

use crate::llm::box_provider::BoxLlmProvider;

use super::picker::{RandomPicker, SpeakerPicker};
use super::prefix::{ReplyPrefix, choose_prefix, displayed_reply};

/// Source of user input lines.
///
/// `None` means the input is exhausted (e.g. Ctrl+D or end of a pipe).
pub trait InputSource {
    fn next_line(&mut self) -> impl Future<Output = Option<String>> + Send;
}

/// A completed assistant reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub speaker: Option<String>,
    pub prefix: String,
    /// Prefix plus continuation, exactly as stored in the transcript.
    pub full_text: String,
    /// What the user is shown.
    pub displayed: String,
    pub usage: Usage,
    pub stop_reason: StopReason,
    pub response_ms: u64,
}

/// Result of feeding one input line to the loop.
#[derive(Debug)]
pub enum TurnOutcome {
    Reply(Reply),
    /// The service answered without the prefix; `reply.displayed` is the
    /// full text.
    ContractViolation { reply: Reply, error: ChatError },
    /// The request failed; the user turn stays in the transcript.
    ServiceFailed(ChatError),
    /// The line was not a usable turn and nothing changed.
    Ignored(ChatError),
    Terminated,
}

/// Interactive chat driven one input line at a time.
pub struct ConversationLoop<P: SpeakerPicker = RandomPicker> {
    provider: BoxLlmProvider,
    config: ChatConfig,
    picker: P,
    transcript: Transcript,
    state: LoopState,
}

impl ConversationLoop<RandomPicker> {
    /// Start a session that picks speakers at random.
    pub fn start(provider: BoxLlmProvider, config: ChatConfig) -> Result<Self, ChatError> {
        Self::with_picker(provider, config, RandomPicker::new())
    }
}

impl<P: SpeakerPicker> ConversationLoop<P> {
    /// Start a session with an explicit speaker picker.
    pub fn with_picker(
        provider: BoxLlmProvider,
        config: ChatConfig,
        picker: P,
    ) -> Result<Self, ChatError> {
        config.validate()?;
        Ok(Self {
            provider,
            config,
            picker,
            transcript: Transcript::new(),
            state: LoopState::AwaitingInput,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Forget every turn so far; the next request starts a fresh exchange.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Stop the loop without a request, as the sentinel does.
    pub fn terminate(&mut self) {
        self.state = LoopState::Terminated;
    }

    /// The request sent for the current transcript with `prefix` as the
    /// partial assistant turn.
    pub fn build_request(&self, prefix: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: self.transcript.request_messages(prefix),
            system: self.config.system_instruction.clone(),
            max_tokens: self.config.max_response_tokens,
            temperature: self.config.temperature,
        }
    }

    /// Feed one input line through the state machine.
    pub async fn step(&mut self, line: &str) -> TurnOutcome {
        if self.state == LoopState::Terminated {
            return TurnOutcome::Terminated;
        }

        let text = line.trim();
        if text == QUIT_SENTINEL {
            debug!("Quit sentinel received");
            self.state = LoopState::Terminated;
            return TurnOutcome::Terminated;
        }
        if text.is_empty() {
            return TurnOutcome::Ignored(ChatError::Input("empty message".to_string()));
        }

        self.transcript.push_user(text);
        let prefix = choose_prefix(&self.config, &mut self.picker);
        self.state = LoopState::RequestInFlight;

        let outcome = self.send(prefix).await;
        self.state = LoopState::AwaitingInput;
        outcome
    }

    /// Drive the loop from `input` until it terminates, reporting every
    /// outcome to `on_outcome`.
    pub async fn run<I, F>(&mut self, input: &mut I, mut on_outcome: F) -> LoopState
    where
        I: InputSource,
        F: FnMut(&TurnOutcome),
    {
        while self.state != LoopState::Terminated {
            let outcome = match input.next_line().await {
                Some(line) => self.step(&line).await,
                None => {
                    self.terminate();
                    TurnOutcome::Terminated
                }
            };
            on_outcome(&outcome);
        }
        self.state
    }

    async fn send(&mut self, prefix: ReplyPrefix) -> TurnOutcome {
        let request = self.build_request(&prefix.text);

        // No windowing: the whole transcript goes out on every request.
        if let Ok(count) = self.provider.count_tokens(&request).await {
            let context_limit = self.provider.capabilities().max_context_tokens;
            debug!(
                turns = self.transcript.len(),
                estimated_input_tokens = count.input_tokens,
                context_limit,
                "Sending transcript"
            );
            if count.input_tokens > context_limit {
                warn!(
                    estimated_input_tokens = count.input_tokens,
                    context_limit,
                    "Transcript likely exceeds the model context window; /clear starts over"
                );
            }
        }

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            prefill.speaker = ?prefix.speaker,
        );

        let start = Instant::now();
        let response = match self.provider.complete(&request).instrument(span).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Completion request failed");
                return TurnOutcome::ServiceFailed(ChatError::Service(e));
            }
        };
        let response_ms = start.elapsed().as_millis() as u64;

        self.transcript.push_assistant(response.content.clone());

        let (displayed, violation) = displayed_reply(&response.content, &prefix.text);
        let reply = Reply {
            speaker: prefix.speaker,
            prefix: prefix.text,
            full_text: response.content,
            displayed,
            usage: response.usage,
            stop_reason: response.stop_reason,
            response_ms,
        };

        match violation {
            Some(error) => {
                warn!(prefix = %reply.prefix, "Response did not start with the prefix");
                TurnOutcome::ContractViolation { reply, error }
            }
            None => TurnOutcome::Reply(reply),
        }
    }
}
