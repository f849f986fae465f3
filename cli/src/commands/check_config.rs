//! `quarantine-agent check-config` — validate the rules file and manifest.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::commands::RulesArgs;
use crate::infra::config::{load_manifest, load_rule_set};

/// Arguments for the check-config command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    #[command(flatten)]
    pub rules: RulesArgs,

    /// Script manifest (JSON) to validate as well
    #[arg(long, env = "QUARANTINE_MANIFEST_PATH")]
    pub manifest: Option<PathBuf>,
}

/// Run `quarantine-agent check-config`, printing a summary of what was loaded.
///
/// # Errors
///
/// Returns an error if either file is unreadable or invalid.
pub fn run(args: &CheckConfigArgs) -> Result<()> {
    let rules = load_rule_set(&args.rules.config_file)?;
    println!(
        "{}: {} quarantine rule(s)",
        args.rules.config_file.display(),
        rules.rules().len()
    );
    for rule in rules.rules() {
        println!("  {rule}");
    }

    if let Some(path) = &args.manifest {
        let manifest = load_manifest(path)?;
        println!("{}: {} script(s)", path.display(), manifest.scripts.len());
        for script in &manifest.scripts {
            println!(
                "  {} ({} {} {})",
                script.name, script.entity_type, script.action_type, script.action_phase
            );
        }
    }
    Ok(())
}
