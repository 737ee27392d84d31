//! Generation relay.
//!
//! Validates the credential, resolves the model profile, wraps the prompt with
//! the fixed system prompt and forwards it upstream in a single call. Every
//! outcome is normalized into [`GenerationSuccess`] or [`RelayError`].
//!
//! The relay holds no per-request state; one instance serves all callers
//! concurrently.

use super::credentials::CredentialSource;
use super::metrics;
use super::prompt::{
    FREQUENCY_PENALTY, MAX_TOKENS, PRESENCE_PENALTY, SYSTEM_PROMPT, TEMPERATURE, TOP_P,
};
use super::providers::{ChatCompletionRequest, ChatProvider, ProviderError, Role, UpstreamMessage};
use crate::models::{self, ModelProfile};
use axum::http::StatusCode;
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Field added to successful upstream bodies.
pub const SELECTED_MODEL_FIELD: &str = "selected_model_name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_key: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model_key: Option<&str>) -> Self {
        Self {
            prompt: prompt.into(),
            model_key: model_key.map(str::to_string),
        }
    }
}

/// Upstream body, untouched apart from [`SELECTED_MODEL_FIELD`].
#[derive(Debug, Clone)]
pub struct GenerationSuccess {
    pub body: Value,
    pub profile: &'static ModelProfile,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelayError {
    #[error("{setting} not configured")]
    MissingCredential { setting: String },

    #[error("Connection Error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("API Error: {0}")]
    UpstreamPayload(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl RelayError {
    /// HTTP-equivalent status. `None` for local connection failures, which
    /// never reached an upstream status line.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RelayError::MissingCredential { .. } => Some(500),
            RelayError::UpstreamHttp { status, .. } => Some(*status),
            RelayError::UpstreamPayload(_) => Some(400),
            RelayError::Transport(_) | RelayError::InvalidResponse(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingCredential { .. } => "configuration",
            RelayError::Transport(_) => "transport",
            RelayError::UpstreamHttp { .. } => "upstream_http",
            RelayError::UpstreamPayload(_) => "upstream_payload",
            RelayError::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Network(detail) => RelayError::Transport(detail),
            ProviderError::Http { status, body } => RelayError::UpstreamHttp { status, body },
            ProviderError::InvalidResponse(detail) => RelayError::InvalidResponse(detail),
            ProviderError::NotConfigured(detail) => RelayError::Transport(detail),
        }
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        let message = err.to_string();
        match err {
            RelayError::MissingCredential { .. } => {
                AppError::ConfigError(anyhow::anyhow!(message))
            }
            RelayError::UpstreamHttp { status, .. } => AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            RelayError::UpstreamPayload(_) => AppError::Upstream {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            RelayError::Transport(_) | RelayError::InvalidResponse(_) => {
                AppError::BadGateway(message)
            }
        }
    }
}

/// Build the upstream payload for `prompt` under `profile`.
pub fn build_payload(prompt: &str, profile: &ModelProfile) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: profile.upstream_id.to_string(),
        messages: vec![
            UpstreamMessage {
                role: Role::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            UpstreamMessage {
                role: Role::User,
                content: prompt.to_string(),
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        top_p: TOP_P,
        frequency_penalty: FREQUENCY_PENALTY,
        presence_penalty: PRESENCE_PENALTY,
    }
}

/// Description of an error object embedded in a success body, if any.
///
/// Absent, `null`, `false`, `0` and `""` do not count as errors. A truthy
/// `error.message` is used as the description, whatever its JSON type;
/// otherwise the whole `error` value is serialized.
fn embedded_error(body: &Value) -> Option<String> {
    let error = body.get("error").filter(|e| is_truthy(e))?;

    let description = match error.get("message").filter(|m| is_truthy(m)) {
        Some(Value::String(message)) => message.clone(),
        Some(message) => message.to_string(),
        None => error.to_string(),
    };
    Some(description)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Clone)]
pub struct GenerationRelay {
    provider: Arc<dyn ChatProvider>,
    credentials: Arc<dyn CredentialSource>,
}

impl GenerationRelay {
    pub fn new(provider: Arc<dyn ChatProvider>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Relay `request` using the credential as it is configured right now.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationSuccess, RelayError> {
        let credential = self.credentials.credential();
        self.generate_with(request, credential.as_deref()).await
    }

    /// Relay `request` with an explicit credential.
    ///
    /// A missing or empty credential fails with status 500 before any
    /// upstream call is made.
    #[tracing::instrument(
        skip_all,
        fields(provider = self.provider.name(), model = tracing::field::Empty)
    )]
    pub async fn generate_with(
        &self,
        request: &GenerationRequest,
        credential: Option<&str>,
    ) -> Result<GenerationSuccess, RelayError> {
        let Some(credential) = credential.filter(|c| !c.is_empty()) else {
            tracing::warn!(setting = %self.credentials.name(), "Upstream credential not configured");
            metrics::record_upstream_error("configuration");
            return Err(RelayError::MissingCredential {
                setting: self.credentials.name().to_string(),
            });
        };

        let profile = models::resolve(request.model_key.as_deref());
        tracing::Span::current().record("model", profile.key.as_str());

        let payload = build_payload(&request.prompt, profile);

        let start = Instant::now();
        let result = self.provider.complete(credential, &payload).await;
        let elapsed = start.elapsed();
        metrics::record_upstream_latency(profile.key.as_str(), elapsed.as_secs_f64());

        let outcome = result
            .map_err(RelayError::from)
            .and_then(|body| Self::normalize(body, profile));

        match &outcome {
            Ok(_) => {
                tracing::info!(
                    latency_ms = elapsed.as_millis() as u64,
                    "Generation completed"
                );
                metrics::record_request(profile.key.as_str(), "success");
            }
            Err(err) => {
                tracing::warn!(
                    error_type = err.kind(),
                    status = ?err.http_status(),
                    latency_ms = elapsed.as_millis() as u64,
                    "Generation failed"
                );
                metrics::record_request(profile.key.as_str(), "failure");
                metrics::record_upstream_error(err.kind());
            }
        }

        outcome
    }

    fn normalize(
        mut body: Value,
        profile: &'static ModelProfile,
    ) -> Result<GenerationSuccess, RelayError> {
        if let Some(description) = embedded_error(&body) {
            return Err(RelayError::UpstreamPayload(description));
        }

        let Some(fields) = body.as_object_mut() else {
            return Err(RelayError::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        };
        fields.insert(
            SELECTED_MODEL_FIELD.to_string(),
            Value::String(profile.display_name.to_string()),
        );

        Ok(GenerationSuccess { body, profile })
    }
}
