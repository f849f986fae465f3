//! `quarantine-agent supervise` — container entrypoint.
//!
//! Runs the transport daemon in the foreground, forwards the action-script
//! log, and registers this host once the daemon has had time to come up.
//! Registration failures are logged and never stop the daemon.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use quarantine_common::SupervisorConfig;

use crate::commands::register;
use crate::infra::supervisor::{ProcessSpec, ShutdownSignals, Supervisor};

/// Run `quarantine-agent supervise`.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed or a child process
/// cannot be started.
pub async fn run(config: SupervisorConfig) -> Result<ExitCode> {
    let mut signals = ShutdownSignals::install()?;
    let daemon = ProcessSpec::new(&config.daemon_program, &config.daemon_args);
    let forwarder = ProcessSpec::log_forwarder(Path::new(&config.log_file));
    let supervisor = Supervisor::spawn(&daemon)?.with_log_forwarder(&forwarder)?;
    tracing::info!(
        pid = supervisor.pid(),
        log_file = %config.log_file,
        warmup_secs = config.warmup_secs,
        "supervising transport daemon"
    );

    let registration = tokio::spawn(register_after_warmup(config));
    let exit = supervisor.run(signals.recv()).await?;
    registration.abort();

    tracing::info!(code = exit.exit_code(), "supervisor exiting");
    Ok(ExitCode::from(exit.exit_code()))
}

async fn register_after_warmup(config: SupervisorConfig) {
    tokio::time::sleep(Duration::from_secs(config.warmup_secs)).await;
    // Detached so an in-flight request never holds up runtime shutdown.
    let spawned = std::thread::Builder::new()
        .name("registration".into())
        .spawn(move || match register::run(&config) {
            Ok(outcome) => tracing::info!(?outcome, "target registration finished"),
            Err(e) => tracing::warn!(error = format!("{e:#}"), "target registration failed; daemon keeps running"),
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "cannot start target registration");
    }
}
