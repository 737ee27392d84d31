//! Model registry.
//!
//! A closed set of model profiles known at compile time. Each profile maps a
//! short key used by clients to the upstream model identifier and the label
//! shown to users.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short key a client uses to pick a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKey {
    /// Fast Output Model, the default.
    Fom,
    /// Research Verifying Model, slower reasoning model.
    Rvm,
}

impl ModelKey {
    pub const DEFAULT: ModelKey = ModelKey::Fom;

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKey::Fom => "fom",
            ModelKey::Rvm => "rvm",
        }
    }

    /// Exact, case-sensitive match against the known keys.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "fom" => Some(ModelKey::Fom),
            "rvm" => Some(ModelKey::Rvm),
            _ => None,
        }
    }

    pub fn profile(&self) -> &'static ModelProfile {
        match self {
            ModelKey::Fom => &PROFILES[0],
            ModelKey::Rvm => &PROFILES[1],
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one selectable model.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ModelProfile {
    pub key: ModelKey,
    #[serde(rename = "id")]
    pub upstream_id: &'static str,
    #[serde(rename = "name")]
    pub display_name: &'static str,
    pub description: &'static str,
}

static PROFILES: [ModelProfile; 2] = [
    ModelProfile {
        key: ModelKey::Fom,
        upstream_id: "deepseek-chat",
        display_name: "FOM 1.0",
        description: "Fast Output Model",
    },
    ModelProfile {
        key: ModelKey::Rvm,
        upstream_id: "deepseek-reasoner",
        display_name: "RVM 1.0",
        description: "Research Verifying Model",
    },
];

/// All registered profiles, default first.
pub fn profiles() -> &'static [ModelProfile] {
    &PROFILES
}

/// Resolve a client-supplied key. Unknown or absent keys fall back to the
/// default profile instead of failing.
pub fn resolve(model_key: Option<&str>) -> &'static ModelProfile {
    model_key
        .and_then(ModelKey::parse)
        .unwrap_or(ModelKey::DEFAULT)
        .profile()
}
