use axum::extract::State;
use axum::Json;

use crate::api::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the registry is loaded, which happens before the router exists.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let registry = state.reconciler.registry();
    Json(serde_json::json!({
        "status": "ready",
        "tokens": registry.token_count(),
        "pairs": registry.pair_count(),
    }))
}
