//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Platform errors ───────────────────────────────────────────────────────────

/// Failures talking to the platform REST API.
///
/// None of these are retried inside one invocation.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Authentication rejected by {host} (HTTP {status}). Check the platform credentials.")]
    Auth { host: String, status: u16 },

    #[error("Cannot reach {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("No platform session. Log in before calling {0}.")]
    NoSession(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Malformed or invariant-violating configuration. Always fatal for the run
/// that loaded it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot parse quarantine rules: {0}")]
    Parse(String),

    #[error("Quarantine rule #{index} ({action_type}): {reason}")]
    InvalidRule {
        index: usize,
        action_type: String,
        reason: String,
    },

    #[error("Cannot parse script manifest: {0}")]
    ManifestParse(String),

    #[error("Manifest script '{name}': {reason}")]
    InvalidScript { name: String, reason: String },
}

// ── Invocation errors ─────────────────────────────────────────────────────────

/// Problems with the action payload the platform passed on stdin.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Invalid action payload: {0}")]
    Malformed(String),

    #[error("Action payload has no action items.")]
    Empty,
}
