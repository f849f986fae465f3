//! The action an evaluation run was invoked for.

use quarantine_common::{ActionScriptPayload, PayloadError};

use crate::domain::error::InvocationError;

/// Entity and action details taken from the platform's stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Platform-internal id of the entity acted upon.
    pub entity_id: String,
    pub entity_name: Option<String>,
    pub action_uuid: String,
    pub action_type: String,
    /// Absent when the platform omits it; no rule applies then.
    pub entity_type: Option<String>,
    pub action_state: Option<String>,
}

impl InvocationContext {
    /// Parses the action-script payload JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or carries no action item.
    pub fn from_json(json: &str) -> Result<Self, InvocationError> {
        let payload: ActionScriptPayload =
            serde_json::from_str(json).map_err(|e| InvocationError::Malformed(e.to_string()))?;
        Self::from_payload(&payload)
    }

    /// Builds the context from the first action item of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Empty`] if the payload has no action items.
    pub fn from_payload(payload: &ActionScriptPayload) -> Result<Self, InvocationError> {
        let item = payload.invocation().map_err(|e| match e {
            PayloadError::NoActionItem => InvocationError::Empty,
        })?;
        Ok(Self {
            entity_id: item.target_se.turbonomic_internal_id.clone(),
            entity_name: item.target_se.display_name.clone(),
            action_uuid: item.uuid.clone(),
            action_type: item.action_type.clone(),
            entity_type: item.target_se.entity_type.clone(),
            action_state: payload.action_state.clone(),
        })
    }

    /// Display name when known, otherwise the entity id.
    #[must_use]
    pub fn entity_label(&self) -> &str {
        self.entity_name.as_deref().unwrap_or(&self.entity_id)
    }
}
