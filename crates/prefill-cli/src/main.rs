//! Prefill CLI entry point.
//!
//! Binary name: `prefill`
//!
//! Parses CLI arguments, sets up tracing, loads `config.toml` and dispatches
//! to the chat loop or the one-shot ask command.

mod cli;

use clap::Parser;
use clap_complete::generate;

use prefill_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::settings::{Settings, show_config};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither tracing nor config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "prefill", &mut std::io::stdout());
        return Ok(());
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,prefill_core=debug,prefill_infra=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(&cli.overrides).await;

    match cli.command {
        Commands::Chat {
            speakers,
            prefix,
            seed,
        } => {
            let settings = settings.with_chat_flags(speakers, prefix);
            cli::chat::loop_runner::run_chat(&settings, seed).await?;
        }

        Commands::Ask {
            prompt,
            prefix,
            show_prefix,
            json,
        } => {
            cli::ask::run_ask(&settings, &prompt, &prefix, show_prefix, json).await?;
        }

        Commands::Config { json } => {
            show_config(&settings, json)?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
