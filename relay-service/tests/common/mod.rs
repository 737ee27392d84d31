#![allow(dead_code)]

use axum::Router;
use relay_service::config::{RelayConfig, UpstreamConfig};
use relay_service::services::credentials::DEFAULT_API_KEY_VAR;
use relay_service::services::providers::mock::MockChatProvider;
use relay_service::services::CredentialSource;
use relay_service::startup::{build_router, AppState, Application};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub const TEST_API_KEY: &str = "test-api-key";

/// Credential that tests can set and clear while the app is running.
pub struct SwitchableCredential {
    value: RwLock<Option<String>>,
}

impl SwitchableCredential {
    pub fn new(value: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            value: RwLock::new(value.map(str::to_string)),
        })
    }

    pub fn set(&self, value: Option<&str>) {
        *self.value.write().unwrap() = value.map(str::to_string);
    }
}

impl CredentialSource for SwitchableCredential {
    fn name(&self) -> &str {
        DEFAULT_API_KEY_VAR
    }

    fn credential(&self) -> Option<String> {
        self.value
            .read()
            .unwrap()
            .clone()
            .filter(|v| !v.is_empty())
    }
}

/// A typical upstream chat-completion body.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "deepseek-chat",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

/// Directory holding the bundled single-page front-end.
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

pub fn test_router(
    provider: Arc<MockChatProvider>,
    credential: Arc<SwitchableCredential>,
) -> Router {
    build_router(AppState::new(provider, credential), &static_dir())
}

pub fn test_config() -> RelayConfig {
    RelayConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        upstream: UpstreamConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            timeout_secs: 5,
        },
        static_dir: static_dir(),
        otlp_endpoint: None,
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockChatProvider>,
    pub credential: Arc<SwitchableCredential>,
}

impl TestApp {
    /// Spawn the full server on a random port around a mock provider.
    pub async fn spawn(provider: MockChatProvider, credential: Option<&str>) -> Self {
        let provider = Arc::new(provider);
        let credential = SwitchableCredential::new(credential);
        let state = AppState::new(provider.clone(), credential.clone());

        let app = Application::with_state(test_config(), state)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer health checks
        let client = reqwest::Client::new();
        let health_url = format!("{}/api/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            provider,
            credential,
        }
    }
}
