//! Infrastructure implementation of the `EnvSource` port.

use crate::application::ports::EnvSource;

/// Reads the process environment. Empty values count as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}
