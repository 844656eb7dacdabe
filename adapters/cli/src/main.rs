#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays recorded matches through the agent.

mod output;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lane_defence_agent::{
    replay::{replay, ReplayScript},
    Agent, AgentConfig,
};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the lane defence agent.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Turn-based lane defence agent")]
struct CliArgs {
    /// Log filter applied when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    log: String,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Plays a recorded match script and prints every turn's plan.
    Replay {
        /// JSON replay script.
        script: PathBuf,
        /// TOML agent configuration; defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format of the plans.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Prints the effective agent configuration as TOML.
    Config {
        /// TOML agent configuration to validate and echo.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Entry point for the lane defence command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(&args.log)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        CliCommand::Replay {
            script,
            config,
            format,
        } => {
            let config = load_config(config)?;
            let script = ReplayScript::load(&script)?;
            let mut agent = Agent::new(config);
            let plans = replay(&mut agent, &script);
            tracing::info!(turns = plans.len(), "replay finished");
            match format {
                OutputFormat::Text => output::write_text(&mut out, &plans)?,
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut out, &plans)
                        .context("failed to write plans")?;
                    writeln!(out)?;
                }
            }
        }
        CliCommand::Config { config } => {
            let config = load_config(config)?;
            write!(out, "{}", config.to_toml_string()?)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<AgentConfig> {
    match path {
        Some(path) => Ok(AgentConfig::load(path)?),
        None => Ok(AgentConfig::default()),
    }
}

fn setup_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter {default_filter:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!(error))
}
