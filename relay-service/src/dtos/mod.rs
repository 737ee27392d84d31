use crate::services::GenerationRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "Prompt cannot be empty"))]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl From<GenerateRequest> for GenerationRequest {
    fn from(req: GenerateRequest) -> Self {
        GenerationRequest {
            prompt: req.prompt,
            model_key: req.model,
        }
    }
}
