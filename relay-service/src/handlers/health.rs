use crate::services::HealthReport;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// `GET /api/health`. Always 200; `api_key_set` reflects the credential at call time.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.report())
}
