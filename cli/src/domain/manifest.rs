//! Sanity checks for the action-script manifest handed to the platform.

use quarantine_common::ScriptManifest;

use crate::domain::error::ConfigError;

/// The only phase this agent is built to run in.
pub const POST_PHASE: &str = "POST";

/// Parses a manifest and checks every script runs after the action.
///
/// # Errors
///
/// Returns an error if the JSON is malformed, lists no scripts, or a script
/// is declared for a phase other than `POST`.
pub fn parse_manifest(json: &str) -> Result<ScriptManifest, ConfigError> {
    let manifest: ScriptManifest =
        serde_json::from_str(json).map_err(|e| ConfigError::ManifestParse(e.to_string()))?;
    if manifest.scripts.is_empty() {
        return Err(ConfigError::ManifestParse("no scripts declared".into()));
    }
    for script in &manifest.scripts {
        if script.action_phase != POST_PHASE {
            return Err(ConfigError::InvalidScript {
                name: script.name.clone(),
                reason: format!(
                    "actionPhase is {}, expected {POST_PHASE}",
                    script.action_phase
                ),
            });
        }
        if script.script_path.trim().is_empty() {
            return Err(ConfigError::InvalidScript {
                name: script.name.clone(),
                reason: "scriptPath must not be empty".into(),
            });
        }
    }
    Ok(manifest)
}
