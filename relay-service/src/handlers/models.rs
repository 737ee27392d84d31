use crate::models::{self, ModelProfile};
use axum::Json;

pub async fn list_models() -> Json<&'static [ModelProfile]> {
    Json(models::profiles())
}
