//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod error;
pub mod history;
pub mod invocation;
pub mod manifest;
pub mod rules;
pub mod target;

pub use error::{ConfigError, InvocationError, PlatformError};
pub use history::{ActionAttemptRecord, History, Outcome, Verdict};
pub use invocation::InvocationContext;
pub use rules::{QuarantineMethod, QuarantineRule, RuleSet, VmtGroup};
pub use target::TargetIdentity;
