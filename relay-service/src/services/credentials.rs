//! Upstream credential lookup.
//!
//! The key is looked up on every request rather than captured at startup, so
//! setting or clearing it takes effect without a restart.

use std::env;

pub const DEFAULT_API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

pub trait CredentialSource: Send + Sync {
    /// Name of the setting that holds the credential, used in error messages.
    fn name(&self) -> &str;

    /// Current credential value. Empty values count as absent.
    fn credential(&self) -> Option<String>;
}

/// Reads the credential from a process environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_VAR)
    }
}

impl CredentialSource for EnvCredential {
    fn name(&self) -> &str {
        &self.var
    }

    fn credential(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|v| !v.is_empty())
    }
}
