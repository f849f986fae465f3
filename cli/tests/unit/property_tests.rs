//! Property-based tests for failure-window evaluation.
//!
//! Uses `proptest` to check the consecutive and windowed modes against a
//! direct count over randomly generated histories.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use quarantine_agent::application::services::evaluation::evaluate;
use quarantine_agent::domain::history::{History, judge};
use quarantine_agent::domain::{Outcome, RuleSet};

use crate::mocks::{FakePlatform, attempt, invocation, now, rule};

/// Outcomes newest first, one hour apart.
fn history_of(outcomes: &[bool]) -> Vec<quarantine_agent::domain::ActionAttemptRecord> {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, failed)| {
            let hours = i64::try_from(i).expect("small index") + 1;
            attempt(hours, if *failed { Outcome::Failure } else { Outcome::Success })
        })
        .collect()
}

proptest! {
    /// Consecutive mode matches iff the newest `failure_count` attempts all failed.
    #[test]
    fn prop_consecutive_mode_counts_leading_failures(
        outcomes in prop::collection::vec(any::<bool>(), 0..20),
        failure_count in 1u32..6,
    ) {
        let history = History::within_window(history_of(&outcomes), now(), 720);
        let verdict = judge(&rule(failure_count, None, &[]), &history);

        let leading = outcomes.iter().take_while(|f| **f).count();
        prop_assert_eq!(verdict.is_match(), leading >= failure_count as usize);
    }

    /// Windowed mode matches iff enough attempts exist and enough of the
    /// newest `attempt_count` failed.
    #[test]
    fn prop_windowed_mode_counts_latest_attempts(
        outcomes in prop::collection::vec(any::<bool>(), 0..20),
        failure_count in 1u32..5,
        extra in 0u32..5,
    ) {
        let attempt_count = failure_count + extra;
        let history = History::within_window(history_of(&outcomes), now(), 720);
        let verdict = judge(&rule(failure_count, Some(attempt_count), &[]), &history);

        let window = attempt_count as usize;
        let expected = outcomes.len() >= window
            && outcomes[..window].iter().filter(|f| **f).count() >= failure_count as usize;
        prop_assert_eq!(verdict.is_match(), expected);
    }

    /// Input order of history records never changes the verdict.
    #[test]
    fn prop_verdict_ignores_record_order(
        outcomes in prop::collection::vec(any::<bool>(), 1..12),
        failure_count in 1u32..4,
    ) {
        let set = RuleSet::new(vec![rule(failure_count, None, &["Q"])]).expect("rules");
        let ordered = FakePlatform::with_history(history_of(&outcomes));
        let mut reversed_records = history_of(&outcomes);
        reversed_records.reverse();
        let reversed = FakePlatform::with_history(reversed_records);

        let a = evaluate(&set, &invocation(), &ordered, now()).expect("evaluate").len();
        let b = evaluate(&set, &invocation(), &reversed, now()).expect("evaluate").len();
        prop_assert_eq!(a, b);
    }
}
