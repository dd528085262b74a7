use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "AI Proposal Creator API" }))
}

/// GET /health
/// Returns a simple status object with service version and the configured model.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "proposal-api",
        "llm": {
            "provider": state.config.llm.provider,
            "model": state.config.llm.model,
        }
    }))
}
