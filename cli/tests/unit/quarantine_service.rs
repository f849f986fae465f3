//! Unit tests for quarantine group management.

#![allow(clippy::expect_used)]

use quarantine_agent::application::services::evaluation::RuleMatch;
use quarantine_agent::application::services::quarantine::{
    Membership, Quarantine, QuarantineExecutor, discharge_all,
};
use quarantine_agent::domain::{QuarantineMethod, RuleSet, Verdict};

use crate::mocks::{ENTITY_ID, FakePlatform, group, rule};

// ── ensure_group_exists ──────────────────────────────────────────────────────

#[test]
fn test_missing_group_is_created_once() {
    let platform = FakePlatform::default();
    let executor = QuarantineExecutor::new(&platform);
    let g = group("Quarantine");

    let first = executor.ensure_group_exists(&g).expect("ensure");
    let second = executor.ensure_group_exists(&g).expect("ensure");

    assert_eq!(first, second);
    assert_eq!(platform.creates(), 1);
    assert_eq!(platform.group_count("Quarantine"), 1);
}

#[test]
fn test_separate_runs_reuse_existing_group() {
    let platform = FakePlatform::default();
    let g = group("Quarantine");

    QuarantineExecutor::new(&platform).ensure_group_exists(&g).expect("first run");
    QuarantineExecutor::new(&platform).ensure_group_exists(&g).expect("second run");

    assert_eq!(platform.creates(), 1);
    assert_eq!(platform.group_count("Quarantine"), 1);
}

#[test]
fn test_existing_group_is_not_recreated() {
    let platform = FakePlatform::default().with_group("Quarantine", &[]);
    let dto = QuarantineExecutor::new(&platform)
        .ensure_group_exists(&group("Quarantine"))
        .expect("ensure");

    assert_eq!(dto.uuid, "g-Quarantine");
    assert_eq!(platform.creates(), 0);
}

// ── add_member ───────────────────────────────────────────────────────────────

#[test]
fn test_add_member_twice_keeps_one_membership() {
    let platform = FakePlatform::default();
    let executor = QuarantineExecutor::new(&platform);
    let g = group("Quarantine");

    assert_eq!(executor.add_member(&g, ENTITY_ID).expect("add"), Membership::Added);
    assert_eq!(executor.add_member(&g, ENTITY_ID).expect("add"), Membership::AlreadyMember);

    assert_eq!(platform.members_of("Quarantine"), vec![ENTITY_ID]);
    assert_eq!(platform.updates(), 1);
}

#[test]
fn test_add_member_keeps_existing_members() {
    let platform = FakePlatform::default().with_group("Quarantine", &["111", "222"]);
    QuarantineExecutor::new(&platform)
        .add_member(&group("Quarantine"), ENTITY_ID)
        .expect("add");

    assert_eq!(platform.members_of("Quarantine"), vec!["111", "222", ENTITY_ID]);
}

#[test]
fn test_add_member_update_failure_is_reported() {
    let platform = FakePlatform {
        fail_group_update: true,
        ..FakePlatform::default()
    };
    let result = QuarantineExecutor::new(&platform).add_member(&group("Quarantine"), ENTITY_ID);
    assert!(result.is_err());
}

// ── admit ────────────────────────────────────────────────────────────────────

#[test]
fn test_admit_applies_every_method_of_every_match() {
    let platform = FakePlatform::default();
    let first = rule(1, None, &["A", "B"]);
    let second = rule(1, Some(1), &["B"]);
    let matches = [
        RuleMatch { rule: &first, verdict: Verdict::Match { failures: 1 } },
        RuleMatch { rule: &second, verdict: Verdict::Match { failures: 1 } },
    ];

    let applied = QuarantineExecutor::new(&platform)
        .admit(&matches, ENTITY_ID)
        .expect("admit");

    assert_eq!(
        applied,
        vec![Membership::Added, Membership::Added, Membership::AlreadyMember]
    );
    assert_eq!(platform.members_of("A"), vec![ENTITY_ID]);
    assert_eq!(platform.members_of("B"), vec![ENTITY_ID]);
}

#[test]
fn test_admit_rule_without_methods_changes_nothing() {
    let platform = FakePlatform::default();
    let bare = rule(1, None, &[]);
    let matches = [RuleMatch { rule: &bare, verdict: Verdict::Match { failures: 1 } }];

    let applied = QuarantineExecutor::new(&platform)
        .admit(&matches, ENTITY_ID)
        .expect("admit");

    assert!(applied.is_empty());
    assert_eq!(platform.creates(), 0);
    assert_eq!(platform.updates(), 0);
}

#[test]
fn test_method_dispatch_reaches_group() {
    let platform = FakePlatform::default();
    let executor = QuarantineExecutor::new(&platform);
    let method = QuarantineMethod::Vmt(group("Quarantine"));

    assert_eq!(method.apply(&executor, ENTITY_ID).expect("apply"), Membership::Added);
    assert_eq!(method.release_all(&executor).expect("release"), vec![ENTITY_ID]);
    assert!(platform.members_of("Quarantine").is_empty());
}

// ── discharge ────────────────────────────────────────────────────────────────

#[test]
fn test_discharge_empties_each_configured_group_once() {
    let platform = FakePlatform::default()
        .with_group("A", &["1", "2"])
        .with_group("B", &[])
        .with_group("Unrelated", &["9"]);
    let set = RuleSet::new(vec![rule(1, None, &["A", "B"]), rule(2, None, &["A"])]).expect("rules");

    let released = discharge_all(&set, &platform).expect("discharge");

    assert_eq!(
        released,
        vec![
            ("A".to_string(), vec!["1".to_string(), "2".to_string()]),
            ("B".to_string(), Vec::new()),
        ]
    );
    assert!(platform.members_of("A").is_empty());
    assert_eq!(platform.members_of("Unrelated"), vec!["9"]);
    // B was already empty, so only A was rewritten.
    assert_eq!(platform.updates(), 1);
}
