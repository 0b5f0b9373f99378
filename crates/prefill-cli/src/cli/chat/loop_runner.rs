//! Chat session orchestration.
//!
//! Builds the provider and conversation loop from the resolved settings,
//! then either runs the interactive REPL (terminal stdin) or drives the
//! loop straight from piped stdin.

use std::io::IsTerminal;
use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Instrument, info, info_span};

use prefill_core::chat::conversation::{ConversationLoop, Reply, TurnOutcome};
use prefill_core::chat::picker::RandomPicker;
use prefill_observe::genai_attrs::{OP_CHAT, span_name};
use prefill_types::chat::{LoopState, Transcript};
use prefill_types::config::ChatConfig;
use prefill_types::llm::MessageRole;

use crate::cli::provider_from_settings;
use crate::cli::settings::Settings;

use super::banner::{print_welcome_banner, voice_summary};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent, StdinLines};
use super::renderer::ChatRenderer;

/// Longest text shown per row in `/history`.
const HISTORY_PREVIEW_CHARS: usize = 100;

/// Run a chat session with the given settings.
pub async fn run_chat(settings: &Settings, seed: Option<u64>) -> anyhow::Result<()> {
    let config = settings.file.to_chat_config()?;
    let provider = provider_from_settings(settings)?;
    let picker = seed.map(RandomPicker::seeded).unwrap_or_default();
    let mut convo = ConversationLoop::with_picker(provider, config, picker)?;

    let session_id = uuid::Uuid::now_v7().to_string();
    let span = info_span!(
        "prefill.session",
        otel.name = %span_name(OP_CHAT, &convo.config().model),
        session.id = %session_id,
    );

    if std::io::stdin().is_terminal() {
        run_interactive(&mut convo, &session_id).instrument(span).await
    } else {
        run_piped(&mut convo).instrument(span).await;
        Ok(())
    }
}

async fn run_interactive(convo: &mut ConversationLoop, session_id: &str) -> anyhow::Result<()> {
    info!(model = %convo.config().model, "Chat session started");
    print_welcome_banner(convo.config(), convo.provider_name(), session_id);

    let renderer = ChatRenderer::new(Some(crossterm::style::Color::Cyan));
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    while convo.state() != LoopState::Terminated {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                convo.terminate();
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Type quit or press Ctrl+D to exit, or keep chatting.").dim()
                );
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::History => print_history(convo.transcript()),
                ChatCommand::Speakers => {
                    println!("\n  {}\n", style(voice_summary(convo.config())).cyan());
                }
                ChatCommand::Clear => {
                    convo.clear_transcript();
                    chat_input.clear();
                    println!("  {}\n", style("Conversation cleared.").dim());
                }
                ChatCommand::Exit => convo.terminate(),
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let spinner = thinking_spinner();
        let outcome = convo.step(&text).await;
        spinner.finish_and_clear();
        print_outcome(&renderer, convo.config(), &outcome);
    }

    println!("\n  {}", style("Session ended.").dim());
    info!(turns = convo.transcript().len(), "Chat session ended");
    Ok(())
}

/// Plain output for scripted sessions: one reply per line on stdout,
/// problems on stderr.
async fn run_piped(convo: &mut ConversationLoop) {
    let mut input = StdinLines::new();
    convo
        .run(&mut input, |outcome| match outcome {
            TurnOutcome::Reply(reply) => println!("{}", reply.displayed),
            TurnOutcome::ContractViolation { reply, error } => {
                eprintln!("warning: {error}");
                println!("{}", reply.displayed);
            }
            TurnOutcome::ServiceFailed(e) => eprintln!("error: {e}"),
            TurnOutcome::Ignored(_) | TurnOutcome::Terminated => {}
        })
        .await;
}

fn print_outcome(renderer: &ChatRenderer, config: &ChatConfig, outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::Reply(reply) => print_reply(renderer, config, reply),
        TurnOutcome::ContractViolation { reply, error } => {
            eprintln!(
                "\n  {} {error}; showing the reply unchanged.",
                style("!").yellow().bold()
            );
            print_reply(renderer, config, reply);
        }
        TurnOutcome::ServiceFailed(e) => {
            eprintln!("\n  {} LLM error: {e}", style("!").red().bold());
            eprintln!(
                "  {}",
                style("Type a message to retry, quit to exit.").dim()
            );
        }
        TurnOutcome::Ignored(_) | TurnOutcome::Terminated => {}
    }
}

fn print_reply(renderer: &ChatRenderer, config: &ChatConfig, reply: &Reply) {
    let (label, slot) = match &reply.speaker {
        Some(name) => {
            let slot = config
                .speakers
                .as_ref()
                .and_then(|roster| roster.names().iter().position(|n| n == name))
                .unwrap_or(0);
            (name.as_str(), slot)
        }
        None => ("Assistant", 0),
    };
    renderer.print_reply(label, slot, &reply.displayed);
    renderer.print_stats_footer(
        reply.usage.output_tokens,
        reply.response_ms,
        &config.model,
        reply.stop_reason,
    );
    println!();
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Render the transcript as a table. Assistant rows show the stored text,
/// prefix included.
pub fn history_table(transcript: &Transcript) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Text").fg(Color::Cyan),
        ]);

    for (i, turn) in transcript.turns().iter().enumerate() {
        let role = match turn.role {
            MessageRole::User => Cell::new("you").fg(Color::Green),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Cyan),
            MessageRole::System => Cell::new("system").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            role,
            Cell::new(preview(&turn.text, HISTORY_PREVIEW_CHARS)),
        ]);
    }
    table
}

fn print_history(transcript: &Transcript) {
    println!();
    if transcript.is_empty() {
        println!("  {}\n", style("No messages yet.").dim());
        return;
    }
    println!("{}", history_table(transcript));
    println!();
}

/// First `max` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
