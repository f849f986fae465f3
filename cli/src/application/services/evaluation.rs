//! Application service — decide which rules match an invocation.
//!
//! History is fetched once per distinct lookback window and every applicable
//! rule is judged before anything is quarantined.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};

use crate::application::ports::ActionHistorySource;
use crate::domain::history::{self, History, Verdict};
use crate::domain::{ActionAttemptRecord, InvocationContext, PlatformError, QuarantineRule, RuleSet};

/// A rule that matched, with the verdict that made it match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'r> {
    pub rule: &'r QuarantineRule,
    pub verdict: Verdict,
}

/// Judges every rule applicable to `ctx` and returns the matches in rule-set
/// order.
///
/// # Errors
///
/// Returns an error if a history query fails; no partial result is returned.
pub fn evaluate<'r>(
    rules: &'r RuleSet,
    ctx: &InvocationContext,
    source: &impl ActionHistorySource,
    now: DateTime<Utc>,
) -> Result<Vec<RuleMatch<'r>>, PlatformError> {
    let mut fetched: HashMap<u32, Vec<ActionAttemptRecord>> = HashMap::new();
    let mut matches = Vec::new();

    for rule in rules.applicable(ctx) {
        let records = match fetched.entry(rule.lookback_hours) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let mut records =
                    source.completed_actions(&ctx.entity_id, &ctx.action_type, rule.lookback_hours)?;
                records.retain(|r| r.entity_id == ctx.entity_id && r.action_type == ctx.action_type);
                e.insert(records)
            }
        };
        let window = History::within_window(records.clone(), now, rule.lookback_hours);
        let verdict = history::judge(rule, &window);

        match verdict {
            Verdict::Match { failures } => {
                tracing::info!(entity = %ctx.entity_label(), rule = %rule, failures, "rule matched");
                matches.push(RuleMatch { rule, verdict });
            }
            Verdict::NoMatch { failures } => {
                tracing::debug!(entity = %ctx.entity_label(), rule = %rule, failures, "rule not matched");
            }
            Verdict::InsufficientHistory { available, required } => {
                tracing::debug!(
                    entity = %ctx.entity_label(),
                    rule = %rule,
                    available,
                    required,
                    "not enough attempts in window to judge rule"
                );
            }
        }
    }

    Ok(matches)
}
