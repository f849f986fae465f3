//! Command implementations

pub mod check_config;
pub mod discharge;
pub mod evaluate;
pub mod register;
pub mod supervise;

use std::path::PathBuf;

use clap::Args;
use clap::builder::BoolishValueParser;

use crate::application::Credentials;
use crate::infra::config::DEFAULT_RULES_PATH;

/// Platform API connection settings.
#[derive(Args, Debug, Clone)]
pub struct PlatformArgs {
    /// Platform API host, `name[:port]`
    #[arg(long, env = "VMT_HOST", default_value = "api.turbonomic.svc.cluster.local:8080")]
    pub vmt_host: String,

    /// Platform user
    #[arg(long, env = "VMT_USERNAME")]
    pub vmt_user: String,

    /// Platform password
    #[arg(long, env = "VMT_PASSWORD", hide_env_values = true)]
    pub vmt_pass: String,

    /// Use HTTPS for the platform API
    #[arg(long, env = "VMT_SSL", value_parser = BoolishValueParser::new())]
    pub vmt_ssl: bool,
}

impl PlatformArgs {
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.vmt_user.clone(),
            password: self.vmt_pass.clone(),
        }
    }
}

/// Location of the quarantine rules file.
#[derive(Args, Debug, Clone)]
pub struct RulesArgs {
    /// Quarantine rules file (YAML)
    #[arg(long, env = "CONFIGFILE", default_value = DEFAULT_RULES_PATH)]
    pub config_file: PathBuf,
}
