//! `quarantine-agent register` — one registration attempt for this host.

use std::path::Path;

use anyhow::Result;
use quarantine_common::SupervisorConfig;

use crate::application::Credentials;
use crate::application::services::registration::{RegistrationOutcome, register_once};
use crate::domain::TargetIdentity;
use crate::infra::config::read_private_key;
use crate::infra::platform::PlatformClient;

/// Registers this host as an action-script target unless it already is.
///
/// # Errors
///
/// Returns an error if the key cannot be read, login fails, or the platform
/// rejects the listing or creation.
pub fn run(config: &SupervisorConfig) -> Result<RegistrationOutcome> {
    let private_key = read_private_key(Path::new(&config.private_key_file))?;
    let identity = TargetIdentity {
        address: config.target_address.clone(),
        port: config.target_port,
        manifest_path: config.manifest_path.clone(),
        user: config.target_user.clone(),
    };
    let credentials = Credentials {
        username: config.vmt_user.clone(),
        password: config.vmt_pass.clone(),
    };
    let mut client = PlatformClient::new(&config.vmt_host, config.vmt_ssl);
    register_once(&mut client, &credentials, &identity, &private_key)
}
