//! Quarantine agent - action-script target registration and failure quarantine

use std::process::ExitCode;

use clap::Parser;
use quarantine_agent::cli::Cli;
use quarantine_agent::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.debug, cli.log_file.as_deref()) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    let to_file = cli.log_file.is_some();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            if to_file {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
