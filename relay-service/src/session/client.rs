//! HTTP client for the relay's public API.

use crate::dtos::GenerateRequest;
use crate::models::ModelKey;
use crate::services::HealthReport;
use reqwest::Client;
use serde_json::Value;

const GENERIC_FAILURE: &str = "Failed to generate response";

/// What a session sees after one generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// 2xx without an `error` field: the relay's success envelope.
    Success(Value),
    /// The relay answered with an `{error}` body or a non-2xx status.
    Failure { status: u16, error: String },
    /// The relay itself could not be reached or returned something unreadable.
    Connection(String),
}

impl GenerateOutcome {
    /// Classify a relay response.
    pub fn from_response(status: u16, body: Value) -> Self {
        let ok = (200..300).contains(&status);
        let error = body.get("error").filter(|e| !is_falsy(e));

        match (ok, error) {
            (true, None) => GenerateOutcome::Success(body),
            (_, Some(error)) => GenerateOutcome::Failure {
                status,
                error: error
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string()),
            },
            (false, None) => GenerateOutcome::Failure {
                status,
                error: GENERIC_FAILURE.to_string(),
            },
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    client: Client,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/generate`. Never fails; every problem becomes an outcome.
    pub async fn generate(&self, prompt: &str, model: ModelKey) -> GenerateOutcome {
        let request = GenerateRequest {
            prompt: prompt.to_string(),
            model: Some(model.as_str().to_string()),
        };

        let response = match self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return GenerateOutcome::Connection(e.to_string()),
        };

        let status = response.status().as_u16();
        match response.json::<Value>().await {
            Ok(body) => GenerateOutcome::from_response(status, body),
            Err(e) => GenerateOutcome::Connection(e.to_string()),
        }
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<HealthReport, reqwest::Error> {
        self.client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
