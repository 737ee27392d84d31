use crate::services::credentials::DEFAULT_API_KEY_VAR;
use crate::services::providers::deepseek::{DeepSeekConfig, DEFAULT_API_BASE};
use service_core::config::{self as core_config, get_env, get_optional_env};
use service_core::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub upstream: UpstreamConfig,
    /// Directory served for every non-API path.
    pub static_dir: PathBuf,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key. The key itself
    /// is read per request.
    pub api_key_var: String,
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn provider_config(&self) -> DeepSeekConfig {
        DeepSeekConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_production();

        let timeout_secs = get_env(
            "UPSTREAM_TIMEOUT_SECS",
            Some(&DEFAULT_TIMEOUT_SECS.to_string()),
            is_prod,
        )?
        .parse()
        .map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS is invalid: {}", e))
        })?;

        Ok(RelayConfig {
            common,
            upstream: UpstreamConfig {
                base_url: get_env("UPSTREAM_API_BASE", Some(DEFAULT_API_BASE), is_prod)?,
                api_key_var: get_env("UPSTREAM_API_KEY_VAR", Some(DEFAULT_API_KEY_VAR), is_prod)?,
                timeout_secs,
            },
            static_dir: PathBuf::from(get_env("STATIC_DIR", Some("static"), is_prod)?),
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
        })
    }
}
