use crate::dtos::GenerateRequest;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;

/// `POST /api/generate`: relay one prompt upstream.
///
/// Responds with the upstream body plus `selected_model_name`, or an
/// `{"error": ...}` body carrying the failure status.
#[tracing::instrument(skip_all, fields(model = ?request.model))]
pub async fn generate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerateRequest>,
) -> Result<Json<Value>, AppError> {
    let success = state.relay.generate(&request.into()).await?;
    Ok(Json(success.body))
}
