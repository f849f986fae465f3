//! Platform wire types and supervisor configuration shared by the quarantine agent.

pub mod config;
pub mod types;

pub use config::SupervisorConfig;
pub use types::*;
