//! Application service — apply and release quarantine methods.
//!
//! Group creation and membership changes must be safe to repeat: concurrent
//! evaluation runs for different entities can hit the same group, and the
//! executor relies on the platform's create-if-absent and add-if-missing
//! semantics rather than any local locking.

use std::cell::RefCell;
use std::collections::HashMap;

use quarantine_common::{GroupApiDto, StaticGroupSpec};

use crate::application::ports::GroupDirectory;
use crate::application::services::evaluation::RuleMatch;
use crate::domain::{PlatformError, QuarantineMethod, RuleSet, VmtGroup};

/// Result of adding an entity to a quarantine group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Added,
    AlreadyMember,
}

/// A way of quarantining an entity.
///
/// Each [`QuarantineMethod`] variant implements this; the evaluator never
/// looks inside a method.
pub trait Quarantine {
    /// Quarantine `entity_id`.
    fn apply<G: GroupDirectory>(
        &self,
        executor: &QuarantineExecutor<'_, G>,
        entity_id: &str,
    ) -> Result<Membership, PlatformError>;

    /// Release every quarantined entity, returning their ids.
    fn release_all<G: GroupDirectory>(
        &self,
        executor: &QuarantineExecutor<'_, G>,
    ) -> Result<Vec<String>, PlatformError>;
}

impl Quarantine for VmtGroup {
    fn apply<G: GroupDirectory>(
        &self,
        executor: &QuarantineExecutor<'_, G>,
        entity_id: &str,
    ) -> Result<Membership, PlatformError> {
        executor.add_member(self, entity_id)
    }

    fn release_all<G: GroupDirectory>(
        &self,
        executor: &QuarantineExecutor<'_, G>,
    ) -> Result<Vec<String>, PlatformError> {
        executor.clear_members(self)
    }
}

impl Quarantine for QuarantineMethod {
    fn apply<G: GroupDirectory>(
        &self,
        executor: &QuarantineExecutor<'_, G>,
        entity_id: &str,
    ) -> Result<Membership, PlatformError> {
        match self {
            Self::Vmt(group) => group.apply(executor, entity_id),
        }
    }

    fn release_all<G: GroupDirectory>(
        &self,
        executor: &QuarantineExecutor<'_, G>,
    ) -> Result<Vec<String>, PlatformError> {
        match self {
            Self::Vmt(group) => group.release_all(executor),
        }
    }
}

/// Applies quarantine methods against the platform's group model.
///
/// Groups resolved during a run are remembered for the rest of that run.
pub struct QuarantineExecutor<'a, G: GroupDirectory> {
    groups: &'a G,
    resolved: RefCell<HashMap<String, GroupApiDto>>,
}

impl<'a, G: GroupDirectory> QuarantineExecutor<'a, G> {
    pub fn new(groups: &'a G) -> Self {
        Self {
            groups,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the static group named `group.group_name`, creating it with
    /// `group.group_type` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or the creation fails.
    pub fn ensure_group_exists(&self, group: &VmtGroup) -> Result<GroupApiDto, PlatformError> {
        if let Some(found) = self.resolved.borrow().get(&group.group_name) {
            return Ok(found.clone());
        }
        let dto = match self.groups.find_group(&group.group_name)? {
            Some(existing) => existing,
            None => {
                tracing::info!(group = %group.group_name, group_type = %group.group_type, "creating quarantine group");
                self.groups
                    .create_static_group(&group.group_name, &group.group_type)?
            }
        };
        self.resolved
            .borrow_mut()
            .insert(group.group_name.clone(), dto.clone());
        Ok(dto)
    }

    /// Adds `entity_id` to the group unless it is already a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the group cannot be resolved, read, or updated.
    pub fn add_member(&self, group: &VmtGroup, entity_id: &str) -> Result<Membership, PlatformError> {
        let dto = self.ensure_group_exists(group)?;
        let mut members = self.groups.group_members(&dto.uuid)?;
        if members.iter().any(|m| m == entity_id) {
            tracing::debug!(group = %group.group_name, entity_id, "entity already quarantined");
            return Ok(Membership::AlreadyMember);
        }
        members.push(entity_id.to_string());
        self.groups
            .update_static_group(&dto.uuid, &static_spec(group, members))?;
        tracing::info!(group = %group.group_name, entity_id, "entity added to quarantine group");
        Ok(Membership::Added)
    }

    /// Empties the group, returning the ids it held.
    ///
    /// # Errors
    ///
    /// Returns an error if the group cannot be resolved, read, or updated.
    pub fn clear_members(&self, group: &VmtGroup) -> Result<Vec<String>, PlatformError> {
        let dto = self.ensure_group_exists(group)?;
        let members = self.groups.group_members(&dto.uuid)?;
        if !members.is_empty() {
            self.groups
                .update_static_group(&dto.uuid, &static_spec(group, Vec::new()))?;
        }
        Ok(members)
    }

    /// Applies every method of every matched rule to `entity_id`, in order.
    ///
    /// Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first platform error encountered.
    pub fn admit(
        &self,
        matches: &[RuleMatch<'_>],
        entity_id: &str,
    ) -> Result<Vec<Membership>, PlatformError> {
        let mut applied = Vec::new();
        for m in matches {
            if m.rule.quarantine_methods.is_empty() {
                tracing::info!(rule = %m.rule, entity_id, "rule matched but has no quarantine methods");
                continue;
            }
            for method in &m.rule.quarantine_methods {
                applied.push(method.apply(self, entity_id)?);
            }
        }
        Ok(applied)
    }
}

fn static_spec(group: &VmtGroup, members: Vec<String>) -> StaticGroupSpec {
    StaticGroupSpec {
        display_name: group.group_name.clone(),
        group_type: group.group_type.clone(),
        is_static: true,
        member_uuid_list: members,
    }
}

/// Releases every entity from every static group the rule set references.
///
/// Returns `(group name, released ids)` per group, in rule-set order.
///
/// # Errors
///
/// Returns the first platform error encountered.
pub fn discharge_all<G: GroupDirectory>(
    rules: &RuleSet,
    groups: &G,
) -> Result<Vec<(String, Vec<String>)>, PlatformError> {
    let executor = QuarantineExecutor::new(groups);
    let mut released = Vec::new();
    for group in rules.vmt_groups() {
        let ids = group.release_all(&executor)?;
        tracing::info!(group = %group.group_name, count = ids.len(), "quarantine group emptied");
        for id in &ids {
            tracing::info!(group = %group.group_name, entity_id = %id, "entity discharged");
        }
        released.push((group.group_name.clone(), ids));
    }
    Ok(released)
}
