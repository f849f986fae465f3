//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::infra::config::load_supervisor_config;

/// Action-script agent: target self-registration and failure quarantine
#[derive(Parser)]
#[command(
    name = "quarantine-agent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Append diagnostics to this file instead of stderr
    #[arg(long, global = true, env = "LOGFILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, env = "DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the transport daemon and register this host as a target
    Supervise,

    /// Register this host as a target once and exit
    Register,

    /// Judge a completed action read from stdin and quarantine on a match
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Remove every entity from the configured quarantine groups
    Discharge(commands::discharge::DischargeArgs),

    /// Validate the rules file and script manifest
    CheckConfig(commands::check_config::CheckConfigArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Command::Supervise => {
                let config = load_supervisor_config()?;
                commands::supervise::run(config).await
            }
            Command::Register => {
                let config = load_supervisor_config()?;
                let outcome = blocking(move || commands::register::run(&config)).await?;
                tracing::info!(?outcome, "registration finished");
                Ok(ExitCode::SUCCESS)
            }
            Command::Evaluate(args) => {
                blocking(move || commands::evaluate::run(&args, std::io::stdin().lock())).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Discharge(args) => {
                blocking(move || commands::discharge::run(&args)).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::CheckConfig(args) => {
                commands::check_config::run(&args)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Runs a command built on the blocking platform client off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("command task panicked")?
}
