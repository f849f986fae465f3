//! Integration tests for the quarantine agent
//!
//! These tests spawn the actual binary and test end-to-end behavior without
//! a real platform: cases either finish before the first request or talk to
//! a local listener.

mod check_config_command;
