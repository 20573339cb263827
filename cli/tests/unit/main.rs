//! Unit tests for the DCE CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod local_assets;
mod mocks;
mod state_backend;
