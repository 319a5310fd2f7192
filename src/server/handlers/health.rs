use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Static liveness probe; does not touch the generation provider.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
