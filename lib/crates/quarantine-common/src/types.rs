use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Action-script invocation payload ─────────────────────────────────────────

/// JSON document the platform writes to the action script's stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionScriptPayload {
    /// State of the triggering action (`SUCCEEDED`, `FAILED`, ...).
    #[serde(default)]
    pub action_state: Option<String>,
    pub action_item: Vec<ActionItem>,
}

/// One action inside an [`ActionScriptPayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub uuid: String,
    pub action_type: String,
    #[serde(rename = "targetSE")]
    pub target_se: TargetEntity,
}

/// The entity an action was executed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEntity {
    pub turbonomic_internal_id: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("action payload contains no action items")]
    NoActionItem,
}

impl ActionScriptPayload {
    /// The action this invocation was triggered for (the first item).
    pub fn invocation(&self) -> Result<&ActionItem, PayloadError> {
        self.action_item.first().ok_or(PayloadError::NoActionItem)
    }
}

// ── Action history ───────────────────────────────────────────────────────────

/// Body of an action history query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionQuery {
    pub action_input: ActionQueryInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionQueryInput {
    /// Relative start, e.g. `-720h`.
    pub start_time: String,
    pub end_time: String,
    pub action_type_list: Vec<String>,
    pub action_state_list: Vec<String>,
}

impl ActionQuery {
    /// Completed actions of `action_type` over the last `lookback_hours`.
    #[must_use]
    pub fn completed(action_type: &str, lookback_hours: u32) -> Self {
        Self {
            action_input: ActionQueryInput {
                start_time: format!("-{lookback_hours}h"),
                end_time: "-0d".to_string(),
                action_type_list: vec![action_type.to_string()],
                action_state_list: vec![
                    ACTION_STATE_SUCCEEDED.to_string(),
                    ACTION_STATE_FAILED.to_string(),
                ],
            },
        }
    }
}

pub const ACTION_STATE_SUCCEEDED: &str = "SUCCEEDED";
pub const ACTION_STATE_FAILED: &str = "FAILED";

/// An action as returned by the history query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionApiDto {
    pub uuid: String,
    pub action_type: String,
    #[serde(default)]
    pub action_state: Option<String>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
}

// ── Targets ──────────────────────────────────────────────────────────────────

/// A registered target as listed by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetApiDto {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub target_type: Option<String>,
}

/// Target creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    pub category: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub display_name: String,
    pub input_fields: Vec<InputField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputField {
    pub name: String,
    pub value: String,
}

impl TargetSpec {
    /// Value of the input field called `name`, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.input_fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

// ── Groups ───────────────────────────────────────────────────────────────────

/// A group as returned by search, create, and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupApiDto {
    pub uuid: String,
    pub display_name: String,
    #[serde(default)]
    pub group_type: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
}

/// Static group create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaticGroupSpec {
    pub display_name: String,
    pub group_type: String,
    pub is_static: bool,
    pub member_uuid_list: Vec<String>,
}

/// A group member; only the id is needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberApiDto {
    pub uuid: String,
}

// ── Script manifest ──────────────────────────────────────────────────────────

/// Action-script manifest consumed by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptManifest {
    pub scripts: Vec<ScriptDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub script_path: String,
    pub entity_type: String,
    pub action_type: String,
    pub action_phase: String,
}
