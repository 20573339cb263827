//! Integration tests for the DCE CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They never reach AWS or a provisioning tool.

mod cli_tests;
mod config_command;
mod deploy_command;
