//! Application service — one-time target self-registration.
//!
//! The existence check and the registration are not atomic. Two instances
//! starting together can both see "absent" and both register; deployments
//! run a single replica.

use anyhow::{Context, Result};

use crate::application::ports::{Credentials, SessionClient, TargetDirectory};
use crate::domain::target::{self, TargetIdentity};
use crate::domain::PlatformError;

/// Outcome of [`register_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A target with this display name already existed.
    AlreadyRegistered,
    /// A new target was created.
    Registered,
}

/// Existence check and creation of this deployment's action target.
pub struct TargetRegistrar<'a, T: TargetDirectory> {
    targets: &'a T,
}

impl<'a, T: TargetDirectory> TargetRegistrar<'a, T> {
    pub fn new(targets: &'a T) -> Self {
        Self { targets }
    }

    /// Returns `true` if a target named after `address` and `manifest_path`
    /// is registered. Always asks the platform; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the target list cannot be fetched.
    pub fn exists(&self, address: &str, manifest_path: &str) -> Result<bool, PlatformError> {
        let wanted = target::display_name(address, manifest_path);
        let targets = self.targets.list_targets()?;
        Ok(targets
            .iter()
            .any(|t| t.display_name.as_deref() == Some(wanted.as_str())))
    }

    /// Registers `identity` with the given private key content.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the request.
    pub fn register(&self, identity: &TargetIdentity, private_key: &str) -> Result<(), PlatformError> {
        self.targets
            .create_target(&identity.registration_spec(private_key))
    }
}

/// Login, register this deployment unless already present, logout.
///
/// Logout runs whether or not the check or registration succeeded.
///
/// # Errors
///
/// Returns an error on login failure or if listing or creating targets fails.
pub fn register_once<C>(
    client: &mut C,
    credentials: &Credentials,
    identity: &TargetIdentity,
    private_key: &str,
) -> Result<RegistrationOutcome>
where
    C: SessionClient + TargetDirectory,
{
    client.login(credentials).context("platform login failed")?;
    let result = check_and_register(client, identity, private_key);
    client.logout();
    result
}

fn check_and_register<T: TargetDirectory>(
    targets: &T,
    identity: &TargetIdentity,
    private_key: &str,
) -> Result<RegistrationOutcome> {
    let registrar = TargetRegistrar::new(targets);
    let display_name = identity.display_name();
    if registrar
        .exists(&identity.address, &identity.manifest_path)
        .context("cannot list registered targets")?
    {
        tracing::info!(target_name = %display_name, "action target already registered");
        return Ok(RegistrationOutcome::AlreadyRegistered);
    }
    registrar
        .register(identity, private_key)
        .with_context(|| format!("cannot register target {display_name}"))?;
    tracing::info!(target_name = %display_name, port = identity.port, "action target registered");
    Ok(RegistrationOutcome::Registered)
}
