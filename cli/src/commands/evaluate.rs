//! `quarantine-agent evaluate` — POST action script entry point.
//!
//! Reads the action payload from stdin, judges the configured rules against
//! the entity's action history and quarantines it on a match.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use crate::application::SessionClient;
use crate::application::services::post_action::handle_completed_action;
use crate::commands::{PlatformArgs, RulesArgs};
use crate::domain::InvocationContext;
use crate::infra::config::load_rule_set;
use crate::infra::platform::PlatformClient;

/// Arguments for the evaluate command.
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    #[command(flatten)]
    pub rules: RulesArgs,
}

/// Run `quarantine-agent evaluate` against the payload on `input`.
///
/// # Errors
///
/// Returns an error if the rules or payload are invalid, login fails, or
/// evaluation or quarantine fails.
pub fn run(args: &EvaluateArgs, mut input: impl Read) -> Result<()> {
    let rules = load_rule_set(&args.rules.config_file)?;

    let mut payload = String::new();
    input
        .read_to_string(&mut payload)
        .context("cannot read action payload from stdin")?;
    let ctx = InvocationContext::from_json(&payload)?;
    tracing::info!(
        entity = %ctx.entity_label(),
        action = %ctx.action_type,
        action_uuid = %ctx.action_uuid,
        entity_type = ctx.entity_type.as_deref().unwrap_or("-"),
        state = ctx.action_state.as_deref().unwrap_or("-"),
        "post action script invoked"
    );

    if rules.applicable(&ctx).next().is_none() {
        tracing::info!(action = %ctx.action_type, "no quarantine rule applies");
        return Ok(());
    }

    let mut client = PlatformClient::new(&args.platform.vmt_host, args.platform.vmt_ssl);
    client
        .login(&args.platform.credentials())
        .context("platform login failed")?;
    let result = handle_completed_action(&client, &rules, &ctx, Utc::now());
    client.logout();
    result.map(drop)
}
