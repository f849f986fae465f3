//! Action history and failure-window evaluation.
//!
//! Pure functions only. Records come in from the platform's history query in
//! any order; [`History`] keeps only those inside the lookback window, newest
//! first.

use chrono::{DateTime, Duration, Utc};

use crate::domain::rules::QuarantineRule;

/// Outcome of one completed action attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Maps a platform action state. States other than `SUCCEEDED` and
    /// `FAILED` describe actions that have not completed and yield `None`.
    #[must_use]
    pub fn from_action_state(state: &str) -> Option<Self> {
        if state.eq_ignore_ascii_case("SUCCEEDED") {
            Some(Self::Success)
        } else if state.eq_ignore_ascii_case("FAILED") {
            Some(Self::Failure)
        } else {
            None
        }
    }
}

/// A completed action against an entity, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAttemptRecord {
    pub entity_id: String,
    pub action_type: String,
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
}

/// Action attempts inside a lookback window, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<ActionAttemptRecord>,
}

impl History {
    /// Keeps records no older than `now - lookback_hours` and sorts them
    /// newest first. A boundary before the earliest representable time
    /// keeps everything.
    #[must_use]
    pub fn within_window(
        mut records: Vec<ActionAttemptRecord>,
        now: DateTime<Utc>,
        lookback_hours: u32,
    ) -> Self {
        let boundary = Duration::try_hours(i64::from(lookback_hours))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        records.retain(|r| r.timestamp >= boundary);
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[ActionAttemptRecord] {
        &self.records
    }

    /// Length of the failure run starting at the most recent record.
    #[must_use]
    pub fn consecutive_failures(&self) -> usize {
        self.records
            .iter()
            .take_while(|r| r.outcome == Outcome::Failure)
            .count()
    }

    /// Failures among the `attempts` most recent records, or `None` when the
    /// window holds fewer than `attempts` records.
    #[must_use]
    pub fn failures_in_latest(&self, attempts: usize) -> Option<usize> {
        if self.records.len() < attempts {
            return None;
        }
        Some(
            self.records[..attempts]
                .iter()
                .filter(|r| r.outcome == Outcome::Failure)
                .count(),
        )
    }
}

/// Result of judging one rule against one history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Enough failures were found.
    Match { failures: usize },
    /// History was sufficient but failures fell short.
    NoMatch { failures: usize },
    /// Windowed rule with fewer records than `attemptCount`.
    InsufficientHistory { available: usize, required: usize },
}

impl Verdict {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Judges `rule` against `history` (already cut to the rule's window).
#[must_use]
pub fn judge(rule: &QuarantineRule, history: &History) -> Verdict {
    let required = rule.failure_count as usize;
    let failures = match rule.attempt_count {
        None => history.consecutive_failures(),
        Some(attempts) => {
            let attempts = attempts as usize;
            match history.failures_in_latest(attempts) {
                Some(failures) => failures,
                None => {
                    return Verdict::InsufficientHistory {
                        available: history.len(),
                        required: attempts,
                    };
                }
            }
        }
    };
    if failures >= required {
        Verdict::Match { failures }
    } else {
        Verdict::NoMatch { failures }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
