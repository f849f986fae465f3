//! Application service — handle one completed platform action.
//!
//! All rules are judged first; quarantine methods run only when evaluation
//! succeeded as a whole.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::application::ports::{ActionHistorySource, GroupDirectory};
use crate::application::services::evaluation;
use crate::application::services::quarantine::{Membership, QuarantineExecutor};
use crate::domain::{InvocationContext, RuleSet};

/// Evaluates `rules` for the invocation and quarantines the entity for every
/// matched rule.
///
/// # Errors
///
/// Returns an error if history cannot be fetched (nothing is applied then) or
/// if applying a quarantine method fails.
pub fn handle_completed_action<P>(
    platform: &P,
    rules: &RuleSet,
    ctx: &InvocationContext,
    now: DateTime<Utc>,
) -> Result<Vec<Membership>>
where
    P: ActionHistorySource + GroupDirectory,
{
    let matches = evaluation::evaluate(rules, ctx, platform, now)
        .context("rule evaluation failed; no quarantine applied")?;
    if matches.is_empty() {
        tracing::info!(entity = %ctx.entity_label(), "entity does not meet any quarantine criteria");
        return Ok(Vec::new());
    }

    let executor = QuarantineExecutor::new(platform);
    let applied = executor
        .admit(&matches, &ctx.entity_id)
        .with_context(|| format!("cannot quarantine {}", ctx.entity_label()))?;
    for m in &matches {
        tracing::info!(entity = %ctx.entity_label(), criteria = %m.rule, "quarantined entity matching criteria");
    }
    Ok(applied)
}
