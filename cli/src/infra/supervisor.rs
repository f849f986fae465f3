//! Child-process supervision for the transport daemon.
//!
//! The daemon is spawned with inherited stdio and its pid recorded. A
//! termination request is forwarded to it as SIGTERM and the supervisor then
//! waits for it to exit. A log-forwarding child copies the action-script log
//! to stdout for as long as the daemon runs.

use std::future::Future;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tokio::signal::unix::{SignalKind, signal};

/// Program and arguments of a supervised child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    #[must_use]
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `tail -F` of `log_file`, starting at its current end.
    #[must_use]
    pub fn log_forwarder(log_file: &Path) -> Self {
        Self::new(
            "tail",
            ["-n".to_string(), "0".to_string(), "-F".to_string(), log_file.display().to_string()],
        )
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }
}

/// Termination request received by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Terminate,
    Interrupt,
}

/// SIGTERM and SIGINT listeners, installed before any child is spawned.
pub struct ShutdownSignals {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    /// # Errors
    ///
    /// Returns an error if a signal handler cannot be registered.
    pub fn install() -> Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate()).context("cannot listen for SIGTERM")?,
            interrupt: signal(SignalKind::interrupt()).context("cannot listen for SIGINT")?,
        })
    }

    /// Resolves on the next SIGTERM or SIGINT.
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.terminate.recv() => ShutdownSignal::Terminate,
            _ = self.interrupt.recv() => ShutdownSignal::Interrupt,
        }
    }
}

/// How supervision ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// The daemon exited on its own.
    DaemonExited(ExitStatus),
    /// A termination request was forwarded and the daemon has exited.
    Shutdown {
        signal: ShutdownSignal,
        daemon: ExitStatus,
    },
}

impl SupervisorExit {
    /// Process exit code for the supervisor: the daemon's own status when it
    /// exited by itself (128 + signal when killed), 0 after a requested
    /// shutdown.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Shutdown { .. } => 0,
            Self::DaemonExited(status) => status
                .code()
                .or_else(|| status.signal().map(|s| 128 + s))
                .and_then(|c| u8::try_from(c).ok())
                .unwrap_or(255),
        }
    }
}

/// A running transport daemon plus its log forwarder.
pub struct Supervisor {
    daemon: Child,
    pid: Pid,
    forwarder: Option<Child>,
}

enum Event {
    Exited(std::io::Result<ExitStatus>),
    Shutdown(ShutdownSignal),
}

impl Supervisor {
    /// Spawns the daemon and records its pid.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started.
    pub fn spawn(daemon: &ProcessSpec) -> Result<Self> {
        let child = daemon
            .command()
            .spawn()
            .with_context(|| format!("failed to spawn {}", daemon.program))?;
        let raw = child
            .id()
            .with_context(|| format!("{} exited before its pid was read", daemon.program))?;
        let pid = Pid::from_raw(i32::try_from(raw).context("pid out of range")?);
        tracing::info!(program = %daemon.program, pid = raw, "transport daemon started");
        Ok(Self {
            daemon: child,
            pid,
            forwarder: None,
        })
    }

    /// Starts the log forwarder alongside the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the forwarder cannot be started.
    pub fn with_log_forwarder(mut self, forwarder: &ProcessSpec) -> Result<Self> {
        let child = forwarder
            .command()
            .spawn()
            .with_context(|| format!("failed to spawn {}", forwarder.program))?;
        self.forwarder = Some(child);
        Ok(self)
    }

    /// Pid of the transport daemon.
    #[must_use]
    pub fn pid(&self) -> i32 {
        self.pid.as_raw()
    }

    /// Waits for the daemon to exit or for `shutdown` to resolve, whichever
    /// comes first. On shutdown the daemon gets SIGTERM and is waited for.
    /// The log forwarder is stopped either way.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the daemon or signalling it fails.
    pub async fn run(mut self, shutdown: impl Future<Output = ShutdownSignal>) -> Result<SupervisorExit> {
        let event = tokio::select! {
            status = self.daemon.wait() => Event::Exited(status),
            signal = shutdown => Event::Shutdown(signal),
        };

        let exit = match event {
            Event::Exited(status) => {
                let status = status.context("waiting for transport daemon")?;
                tracing::warn!(%status, "transport daemon exited");
                SupervisorExit::DaemonExited(status)
            }
            Event::Shutdown(signal) => {
                tracing::info!(?signal, pid = self.pid.as_raw(), "forwarding SIGTERM to transport daemon");
                forward_terminate(self.pid)?;
                let daemon = self
                    .daemon
                    .wait()
                    .await
                    .context("waiting for transport daemon to stop")?;
                tracing::info!(status = %daemon, "transport daemon stopped");
                SupervisorExit::Shutdown { signal, daemon }
            }
        };

        if let Some(mut forwarder) = self.forwarder.take() {
            let _ = forwarder.kill().await;
        }
        Ok(exit)
    }
}

fn forward_terminate(pid: Pid) -> Result<()> {
    match kill(pid, Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(e).with_context(|| format!("cannot signal pid {pid}")),
    }
}
