//! Command implementations

pub mod config;
pub mod init;
pub mod system;
pub mod version;

/// Exit code when the user declines a confirmation prompt.
pub const EXIT_ABORTED: u8 = 3;
