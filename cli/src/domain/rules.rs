//! Quarantine rule schema and validation.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::invocation::InvocationContext;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_LOOKBACK_HOURS: u32 = 720;
pub const DEFAULT_FAILURE_COUNT: u32 = 1;
/// One hundred years; keeps the window boundary representable.
pub const MAX_LOOKBACK_HOURS: u32 = 876_000;

// ── Rule schema ──────────────────────────────────────────────────────────────

/// Top-level rules document (`config.yaml`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleDocument {
    quarantine_rules: Vec<QuarantineRule>,
}

/// When and how to quarantine an entity after an action completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuarantineRule {
    /// Platform action type, e.g. `MOVE` or `RESIZE`.
    pub action_type: String,
    /// Platform entity type, e.g. `VIRTUAL_MACHINE`.
    pub entity_type: String,
    /// Trailing window of history considered, in hours.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// Failures needed to quarantine.
    #[serde(default = "default_failure_count")]
    pub failure_count: u32,
    /// When set, `failure_count` failures out of the last `attempt_count`
    /// attempts trigger quarantine. When unset, failures must be consecutive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_count: Option<u32>,
    /// Methods applied in order when the rule matches. May be empty.
    pub quarantine_methods: Vec<QuarantineMethod>,
}

fn default_lookback_hours() -> u32 {
    DEFAULT_LOOKBACK_HOURS
}

fn default_failure_count() -> u32 {
    DEFAULT_FAILURE_COUNT
}

/// How an entity is quarantined. Tagged by `type` in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuarantineMethod {
    /// Membership in a platform static group.
    Vmt(VmtGroup),
}

/// A platform static group used as a quarantine list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VmtGroup {
    pub group_name: String,
    /// Entity type of the group; only used when the group has to be created.
    pub group_type: String,
}

impl QuarantineRule {
    /// Returns `true` if this rule is concerned with the invocation's action
    /// and entity type.
    #[must_use]
    pub fn applies_to(&self, ctx: &InvocationContext) -> bool {
        self.action_type == ctx.action_type
            && ctx.entity_type.as_deref() == Some(self.entity_type.as_str())
    }

    /// Human-readable description of what triggers this rule.
    #[must_use]
    pub fn criteria(&self) -> String {
        let head = format!(
            "Fail {} {} actions {}",
            self.entity_type, self.action_type, self.failure_count
        );
        match self.attempt_count {
            Some(attempts) => format!("{head} out of {attempts} attempts."),
            None => format!("{head} in a row."),
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidRule {
            index,
            action_type: self.action_type.clone(),
            reason,
        };
        if self.action_type.trim().is_empty() {
            return Err(invalid("actionType must not be empty".into()));
        }
        if self.entity_type.trim().is_empty() {
            return Err(invalid("entityType must not be empty".into()));
        }
        if self.lookback_hours == 0 {
            return Err(invalid("lookbackHours must be at least 1".into()));
        }
        if self.lookback_hours > MAX_LOOKBACK_HOURS {
            return Err(invalid(format!(
                "lookbackHours ({}) exceeds {MAX_LOOKBACK_HOURS}",
                self.lookback_hours
            )));
        }
        if self.failure_count == 0 {
            return Err(invalid("failureCount must be at least 1".into()));
        }
        if let Some(attempts) = self.attempt_count
            && self.failure_count > attempts
        {
            return Err(invalid(format!(
                "failureCount ({}) exceeds attemptCount ({attempts})",
                self.failure_count
            )));
        }
        for method in &self.quarantine_methods {
            match method {
                QuarantineMethod::Vmt(group) => {
                    if group.group_name.trim().is_empty() {
                        return Err(invalid("vmt groupName must not be empty".into()));
                    }
                    if group.group_type.trim().is_empty() {
                        return Err(invalid(format!(
                            "vmt group '{}' has an empty groupType",
                            group.group_name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for QuarantineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.criteria())
    }
}

// ── Rule set ─────────────────────────────────────────────────────────────────

/// Validated, immutable, ordered set of quarantine rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<QuarantineRule>,
}

impl RuleSet {
    /// Validates `rules` and wraps them.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation, naming the rule index.
    pub fn new(rules: Vec<QuarantineRule>) -> Result<Self, ConfigError> {
        for (index, rule) in rules.iter().enumerate() {
            rule.validate(index)?;
        }
        Ok(Self { rules })
    }

    /// Parses and validates a YAML rules document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, a required key is
    /// missing, or a rule violates an invariant.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let doc: RuleDocument =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::new(doc.quarantine_rules)
    }

    #[must_use]
    pub fn rules(&self) -> &[QuarantineRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules concerned with this invocation, in configuration order.
    pub fn applicable<'a, 'c>(
        &'a self,
        ctx: &'c InvocationContext,
    ) -> impl Iterator<Item = &'a QuarantineRule> + use<'a, 'c> {
        self.rules.iter().filter(move |rule| rule.applies_to(ctx))
    }

    /// Every distinct static group referenced by any rule, first occurrence
    /// wins.
    #[must_use]
    pub fn vmt_groups(&self) -> Vec<&VmtGroup> {
        let mut groups: Vec<&VmtGroup> = Vec::new();
        for method in self.rules.iter().flat_map(|r| &r.quarantine_methods) {
            let QuarantineMethod::Vmt(group) = method;
            if !groups.iter().any(|g| g.group_name == group.group_name) {
                groups.push(group);
            }
        }
        groups
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
