use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Liveness only: the backend is not contacted.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.backend.base_url(),
        "drafts": state.drafts.len().await,
    }))
}
