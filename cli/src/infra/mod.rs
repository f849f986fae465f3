//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: platform REST calls, file
//! loading, and child-process supervision.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` are forbidden.

pub mod config;
pub mod platform;
pub mod supervisor;
