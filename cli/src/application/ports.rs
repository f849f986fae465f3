//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) the platform client must fulfill.
//! All calls are synchronous and blocking; none retries on failure.

use quarantine_common::{GroupApiDto, StaticGroupSpec, TargetApiDto, TargetSpec};

use crate::domain::{ActionAttemptRecord, PlatformError};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Platform login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ── Session Port ──────────────────────────────────────────────────────────────

/// Authenticated session lifecycle. At most one session is live per client.
pub trait SessionClient {
    /// Drop any existing session, then authenticate.
    ///
    /// # Errors
    ///
    /// [`PlatformError::Auth`] on rejected credentials,
    /// [`PlatformError::Network`] when the platform is unreachable.
    fn login(&mut self, credentials: &Credentials) -> Result<(), PlatformError>;
    /// Discard the session. No-op when none exists.
    fn logout(&mut self);
}

// ── Target Port ───────────────────────────────────────────────────────────────

/// Registered action targets.
pub trait TargetDirectory {
    /// List every target registered with the platform.
    fn list_targets(&self) -> Result<Vec<TargetApiDto>, PlatformError>;
    /// Register a new target.
    fn create_target(&self, spec: &TargetSpec) -> Result<(), PlatformError>;
}

// ── History Port ──────────────────────────────────────────────────────────────

/// Completed-action history for an entity.
pub trait ActionHistorySource {
    /// Completed attempts of `action_type` against `entity_id` over the last
    /// `lookback_hours`, in any order.
    fn completed_actions(
        &self,
        entity_id: &str,
        action_type: &str,
        lookback_hours: u32,
    ) -> Result<Vec<ActionAttemptRecord>, PlatformError>;
}

// ── Group Port ────────────────────────────────────────────────────────────────

/// Static groups on the platform.
pub trait GroupDirectory {
    /// Find a group whose display name is exactly `name`.
    fn find_group(&self, name: &str) -> Result<Option<GroupApiDto>, PlatformError>;
    /// Create an empty static group.
    fn create_static_group(&self, name: &str, group_type: &str)
    -> Result<GroupApiDto, PlatformError>;
    /// Ids of the group's current members.
    fn group_members(&self, group_uuid: &str) -> Result<Vec<String>, PlatformError>;
    /// Replace the group's definition, including its member list.
    fn update_static_group(
        &self,
        group_uuid: &str,
        spec: &StaticGroupSpec,
    ) -> Result<(), PlatformError>;
}
