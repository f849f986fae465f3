//! This deployment's identity as a platform action target.

use quarantine_common::{InputField, TargetSpec};

pub const TARGET_CATEGORY: &str = "Orchestrator";
pub const TARGET_TYPE: &str = "Action Script";

/// Display name the platform shows for a registered action-script target.
#[must_use]
pub fn display_name(address: &str, manifest_path: &str) -> String {
    format!("{address}:{manifest_path}")
}

/// Where and how the platform reaches this deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetIdentity {
    pub address: String,
    pub port: u16,
    pub manifest_path: String,
    pub user: String,
}

impl TargetIdentity {
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.address, &self.manifest_path)
    }

    /// Registration request carrying the private key used by the platform to
    /// reach the transport daemon.
    #[must_use]
    pub fn registration_spec(&self, private_key: &str) -> TargetSpec {
        let field = |name: &str, value: String| InputField {
            name: name.to_string(),
            value,
        };
        TargetSpec {
            category: TARGET_CATEGORY.to_string(),
            target_type: TARGET_TYPE.to_string(),
            display_name: self.display_name(),
            input_fields: vec![
                field("nameOrAddress", self.address.clone()),
                field("port", self.port.to_string()),
                field("manifestPath", self.manifest_path.clone()),
                field("userid", self.user.clone()),
                field("privateKeyString", private_key.to_string()),
            ],
        }
    }
}
