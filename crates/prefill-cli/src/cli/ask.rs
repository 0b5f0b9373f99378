//! `prefill ask`: one prompt, one prefixed reply.

use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Instrument, info_span};

use prefill_core::chat::ask::{AskOutcome, ask};
use prefill_observe::genai_attrs::{OP_ASK, span_name};

use super::chat::renderer::ChatRenderer;
use super::provider_from_settings;
use super::settings::Settings;

/// Send `prompt` and print the reply.
///
/// The reply is printed without the prefix unless `show_prefix` is set.
/// Styled output is used only when stdout is a terminal.
pub async fn run_ask(
    settings: &Settings,
    prompt: &str,
    prefix: &str,
    show_prefix: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = settings.file.to_chat_config()?;
    let provider = provider_from_settings(settings)?;
    let styled = !json && Term::stdout().is_term();

    let spinner = if styled {
        let spinner = ProgressBar::new_spinner();
        if let Ok(s) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(s);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    } else {
        None
    };

    let span = info_span!("prefill.ask", otel.name = %span_name(OP_ASK, &config.model));
    let result = ask(&provider, &config, prompt, prefix).instrument(span).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let outcome = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ask_json(&outcome))?);
        return Ok(());
    }

    if let Some(violation) = &outcome.violation {
        eprintln!(
            "{} {violation}; showing the reply unchanged.",
            style("!").yellow().bold()
        );
    }

    let text = output_text(&outcome, show_prefix);
    if styled {
        let renderer = ChatRenderer::new(None);
        println!("{}", renderer.render_final(text).trim_end());
    } else {
        println!("{text}");
    }
    Ok(())
}

fn output_text(outcome: &AskOutcome, show_prefix: bool) -> &str {
    if show_prefix {
        &outcome.full_text
    } else {
        &outcome.displayed
    }
}

fn ask_json(outcome: &AskOutcome) -> serde_json::Value {
    serde_json::json!({
        "prefix": outcome.prefix,
        "reply": outcome.displayed,
        "full_text": outcome.full_text,
        "prefix_honored": outcome.violation.is_none(),
        "usage": {
            "input_tokens": outcome.usage.input_tokens,
            "output_tokens": outcome.usage.output_tokens,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefill_types::error::ChatError;
    use prefill_types::llm::Usage;

    fn outcome(violation: Option<ChatError>) -> AskOutcome {
        AskOutcome {
            prefix: "Bonjour".to_string(),
            full_text: "Bonjour, comment allez-vous ?".to_string(),
            displayed: ", comment allez-vous ?".to_string(),
            usage: Usage {
                input_tokens: 12,
                output_tokens: 7,
            },
            violation,
        }
    }

    #[test]
    fn test_output_text_hides_prefix_by_default() {
        let o = outcome(None);
        assert_eq!(output_text(&o, false), ", comment allez-vous ?");
        assert_eq!(output_text(&o, true), "Bonjour, comment allez-vous ?");
    }

    #[test]
    fn test_ask_json_fields() {
        let value = ask_json(&outcome(None));
        assert_eq!(value["prefix"], "Bonjour");
        assert_eq!(value["reply"], ", comment allez-vous ?");
        assert_eq!(value["prefix_honored"], true);
        assert_eq!(value["usage"]["output_tokens"], 7);
    }

    #[test]
    fn test_ask_json_reports_violation() {
        let violation = ChatError::ContractViolation {
            prefix: "Bonjour".to_string(),
            response: "Hello".to_string(),
        };
        let value = ask_json(&outcome(Some(violation)));
        assert_eq!(value["prefix_honored"], false);
    }
}
