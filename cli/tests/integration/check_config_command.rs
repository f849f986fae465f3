//! `check-config` against files on disk.

#![allow(clippy::expect_used)]

use std::io::Write;

use predicates::prelude::*;
use tempfile::NamedTempFile;

use crate::cli_tests::agent;

fn file_with(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("temp file");
    f.write_all(content.as_bytes()).expect("write");
    f
}

const RULES: &str = "\
quarantineRules:
- actionType: MOVE
  entityType: VIRTUAL_MACHINE
  lookbackHours: 48
  failureCount: 2
  quarantineMethods:
  - type: vmt
    groupName: Failed VM moves
    groupType: VirtualMachine
- actionType: RESIZE
  entityType: VIRTUAL_MACHINE
  failureCount: 2
  attemptCount: 3
  quarantineMethods: []
";

#[test]
fn test_check_config_summarises_rules() {
    let rules = file_with(RULES);
    agent()
        .args(["check-config", "--config-file"])
        .arg(rules.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 quarantine rule(s)"))
        .stdout(predicate::str::contains("Fail VIRTUAL_MACHINE MOVE actions 2 in a row."))
        .stdout(predicate::str::contains("Fail VIRTUAL_MACHINE RESIZE actions 2 out of 3 attempts."));
}

#[test]
fn test_check_config_reads_config_file_from_env() {
    let rules = file_with(RULES);
    agent()
        .arg("check-config")
        .env("CONFIGFILE", rules.path())
        .assert()
        .success();
}

#[test]
fn test_check_config_rejects_impossible_rule() {
    let rules = file_with(
        "quarantineRules:\n- actionType: MOVE\n  entityType: VIRTUAL_MACHINE\n  failureCount: 4\n  attemptCount: 3\n  quarantineMethods: []\n",
    );
    agent()
        .args(["check-config", "--config-file"])
        .arg(rules.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid rules"));
}

#[test]
fn test_check_config_rejects_unknown_method_type() {
    let rules = file_with(
        "quarantineRules:\n- actionType: MOVE\n  entityType: VIRTUAL_MACHINE\n  quarantineMethods:\n  - type: email\n    to: ops\n",
    );
    agent()
        .args(["check-config", "--config-file"])
        .arg(rules.path())
        .assert()
        .failure();
}

#[test]
fn test_check_config_missing_file_names_path() {
    agent()
        .args(["check-config", "--config-file", "/nonexistent/config.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/config.yaml"));
}

#[test]
fn test_check_config_validates_manifest() {
    let rules = file_with(RULES);
    let manifest = file_with(
        r#"{"scripts":[{"name":"Quarantine","description":"","scriptPath":"quarantine.sh","entityType":"VIRTUAL_MACHINE","actionType":"MOVE","actionPhase":"POST"}]}"#,
    );
    agent()
        .args(["check-config", "--config-file"])
        .arg(rules.path())
        .arg("--manifest")
        .arg(manifest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 script(s)"));
}

#[test]
fn test_check_config_rejects_pre_phase_manifest() {
    let rules = file_with(RULES);
    let manifest = file_with(
        r#"{"scripts":[{"name":"Quarantine","scriptPath":"quarantine.sh","entityType":"VIRTUAL_MACHINE","actionType":"MOVE","actionPhase":"PRE"}]}"#,
    );
    agent()
        .args(["check-config", "--config-file"])
        .arg(rules.path())
        .arg("--manifest")
        .arg(manifest.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid manifest"));
}
