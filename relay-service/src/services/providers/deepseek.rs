//! DeepSeek chat-completion provider.
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol over HTTPS with a
//! bearer token. Any endpoint with the same wire format works by changing the
//! base URL.

use super::{ChatCompletionRequest, ChatProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com";

#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct DeepSeekProvider {
    config: DeepSeekConfig,
    client: Client,
}

impl DeepSeekProvider {
    pub fn new(config: DeepSeekConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn complete(
        &self,
        credential: &str,
        request: &ChatCompletionRequest,
    ) -> Result<Value, ProviderError> {
        tracing::debug!(
            model = %request.model,
            prompt_len = request.user_message().map(str::len).unwrap_or(0),
            "Sending request to upstream chat API"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}
