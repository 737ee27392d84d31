use super::credentials::CredentialSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const HEALTHY: &str = "healthy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(rename = "api_key_set")]
    pub credential_configured: bool,
}

/// Reports liveness plus whether the upstream credential is currently set.
#[derive(Clone)]
pub struct HealthReporter {
    credentials: Arc<dyn CredentialSource>,
}

impl HealthReporter {
    pub fn new(credentials: Arc<dyn CredentialSource>) -> Self {
        Self { credentials }
    }

    pub fn report(&self) -> HealthReport {
        HealthReport {
            status: HEALTHY.to_string(),
            credential_configured: self.credentials.credential().is_some(),
        }
    }
}
