//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, release
//! downloads, archive extraction, AWS calls and filesystem access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod adapters;
pub mod archive;
pub mod command_runner;
pub mod config;
pub mod env;
pub mod fs;
pub mod release;
pub mod storage;
pub mod terraform;
