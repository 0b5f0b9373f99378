//! CLI command definitions for the `prefill` binary.
//!
//! Uses clap derive macros for argument parsing. Settings shared by every
//! command (model, token limit, system instruction) are global flags that
//! override `config.toml`.

pub mod ask;
pub mod chat;
pub mod settings;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use prefill_core::llm::box_provider::BoxLlmProvider;
use prefill_infra::llm::{API_KEY_ENV, api_key_from_env, create_provider};
use prefill_types::llm::LlmError;

use settings::Settings;

/// Steer chat replies by writing the first words yourself.
#[derive(Parser)]
#[command(name = "prefill", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override values from `config.toml`.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Directory holding config.toml (default: ~/.prefill).
    #[arg(long, global = true, env = "PREFILL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Model identifier.
    #[arg(long, short = 'm', global = true)]
    pub model: Option<String>,

    /// Maximum tokens per reply.
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 - 1.0).
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// System instruction sent with every request.
    #[arg(long, short = 's', global = true)]
    pub system: Option<String>,

    /// Completion service base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat; each reply starts with a prefix you choose.
    Chat {
        /// Roleplay speaker; repeat for a roster picked at random per reply.
        #[arg(long = "speaker", value_name = "NAME")]
        speakers: Vec<String>,

        /// Static reply prefix, used when no speakers are given.
        #[arg(long, conflicts_with = "speakers")]
        prefix: Option<String>,

        /// Seed for speaker selection, for reproducible sessions.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Send a single prompt with an optional reply prefix.
    Ask {
        /// The user prompt.
        prompt: String,

        /// Text the reply must start with.
        #[arg(long, default_value = "")]
        prefix: String,

        /// Print the prefix together with the reply.
        #[arg(long)]
        show_prefix: bool,

        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration.
    Config {
        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Build the completion provider from the resolved settings.
pub fn provider_from_settings(settings: &Settings) -> anyhow::Result<BoxLlmProvider> {
    match create_provider(&settings.file, api_key_from_env()) {
        Ok(provider) => Ok(provider),
        Err(LlmError::AuthenticationFailed) => Err(anyhow::anyhow!(
            "{API_KEY_ENV} is not set. Export your Anthropic API key and try again."
        )),
        Err(e) => Err(e.into()),
    }
}
