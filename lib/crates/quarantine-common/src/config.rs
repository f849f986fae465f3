use serde::Deserialize;

/// Supervisor configuration, read once at process start.
///
/// Every field maps to `QUARANTINE_<FIELD>` when loaded with
/// `envy::prefixed("QUARANTINE_")`. The value is immutable after
/// construction and handed by reference to the registration sequence and the
/// process supervisor.
#[derive(Clone, Deserialize)]
pub struct SupervisorConfig {
    /// Platform API host, `host[:port]`.
    #[serde(default = "default_vmt_host")]
    pub vmt_host: String,

    /// Platform API username.
    pub vmt_user: String,

    /// Platform API password.
    pub vmt_pass: String,

    /// Use HTTPS for platform API calls.
    #[serde(default)]
    pub vmt_ssl: bool,

    /// Externally reachable address of this deployment.
    pub target_address: String,

    /// Port the platform uses to reach the transport daemon.
    #[serde(default = "default_target_port")]
    pub target_port: u16,

    /// User the platform authenticates as over the transport.
    #[serde(default = "default_target_user")]
    pub target_user: String,

    /// Path of the action-script manifest as seen by the platform.
    pub manifest_path: String,

    /// Private key file whose content is sent in the registration payload.
    pub private_key_file: String,

    /// Transport daemon executable.
    #[serde(default = "default_daemon_program")]
    pub daemon_program: String,

    /// Transport daemon arguments (comma-separated in the environment).
    #[serde(default = "default_daemon_args")]
    pub daemon_args: Vec<String>,

    /// Action-script log file forwarded to stdout.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Seconds between daemon spawn and the registration sequence.
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,
}

impl std::fmt::Debug for SupervisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisorConfig")
            .field("vmt_host", &self.vmt_host)
            .field("vmt_user", &self.vmt_user)
            .field("vmt_pass", &"<redacted>")
            .field("vmt_ssl", &self.vmt_ssl)
            .field("target_address", &self.target_address)
            .field("target_port", &self.target_port)
            .field("target_user", &self.target_user)
            .field("manifest_path", &self.manifest_path)
            .field("private_key_file", &self.private_key_file)
            .field("daemon_program", &self.daemon_program)
            .field("daemon_args", &self.daemon_args)
            .field("log_file", &self.log_file)
            .field("warmup_secs", &self.warmup_secs)
            .finish()
    }
}

fn default_vmt_host() -> String {
    "api.turbonomic.svc.cluster.local:8080".to_string()
}

fn default_target_port() -> u16 {
    22
}

fn default_target_user() -> String {
    "turbo".to_string()
}

fn default_daemon_program() -> String {
    "/usr/sbin/sshd".to_string()
}

fn default_daemon_args() -> Vec<String> {
    vec!["-D".to_string(), "-e".to_string()]
}

fn default_log_file() -> String {
    "/var/log/quarantine.log".to_string()
}

fn default_warmup_secs() -> u64 {
    15
}
