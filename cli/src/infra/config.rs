//! Loads the rules file and the script manifest from disk.

use std::path::Path;

use anyhow::{Context, Result};
use quarantine_common::{ScriptManifest, SupervisorConfig};

use crate::domain::RuleSet;
use crate::domain::manifest::parse_manifest;

/// Default location of the rules file inside the agent image.
pub const DEFAULT_RULES_PATH: &str = "/opt/turbonomic/actionscripts/quarantine/config/config.yaml";

/// Reads and validates the YAML rules file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the rules are invalid.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    RuleSet::from_yaml(&content).with_context(|| format!("invalid rules in {}", path.display()))
}

/// Reads and checks the JSON script manifest at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the manifest is invalid.
pub fn load_manifest(path: &Path) -> Result<ScriptManifest> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    parse_manifest(&content).with_context(|| format!("invalid manifest {}", path.display()))
}

/// Reads the private key file sent in the registration payload.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is empty.
pub fn read_private_key(path: &Path) -> Result<String> {
    let key = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read private key {}", path.display()))?;
    anyhow::ensure!(!key.trim().is_empty(), "private key {} is empty", path.display());
    Ok(key)
}

/// Environment prefix of the supervisor settings.
pub const SUPERVISOR_ENV_PREFIX: &str = "QUARANTINE_";

/// Loads the supervisor settings from `QUARANTINE_*` environment variables.
///
/// # Errors
///
/// Returns an error if a required variable is missing or malformed.
pub fn load_supervisor_config() -> Result<SupervisorConfig> {
    envy::prefixed(SUPERVISOR_ENV_PREFIX)
        .from_env::<SupervisorConfig>()
        .context(
            "failed to load supervisor config from environment \
             (QUARANTINE_VMT_USER, QUARANTINE_VMT_PASS, QUARANTINE_TARGET_ADDRESS, \
             QUARANTINE_MANIFEST_PATH and QUARANTINE_PRIVATE_KEY_FILE are required)",
        )
}
