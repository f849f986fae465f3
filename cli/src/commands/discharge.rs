//! `quarantine-agent discharge` — empty every configured quarantine group.

use anyhow::{Context, Result};
use clap::Args;

use crate::application::SessionClient;
use crate::application::services::quarantine::discharge_all;
use crate::commands::{PlatformArgs, RulesArgs};
use crate::infra::config::load_rule_set;
use crate::infra::platform::PlatformClient;

/// Arguments for the discharge command.
#[derive(Args, Debug, Clone)]
pub struct DischargeArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    #[command(flatten)]
    pub rules: RulesArgs,
}

/// Run `quarantine-agent discharge`.
///
/// # Errors
///
/// Returns an error if the rules are invalid, login fails, or a group cannot
/// be emptied.
pub fn run(args: &DischargeArgs) -> Result<()> {
    let rules = load_rule_set(&args.rules.config_file)?;
    let mut client = PlatformClient::new(&args.platform.vmt_host, args.platform.vmt_ssl);
    client
        .login(&args.platform.credentials())
        .context("platform login failed")?;
    let result = discharge_all(&rules, &client).context("cannot discharge quarantine groups");
    client.logout();
    let released = result?;
    let total: usize = released.iter().map(|(_, ids)| ids.len()).sum();
    tracing::info!(groups = released.len(), entities = total, "discharge complete");
    Ok(())
}
