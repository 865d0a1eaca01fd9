use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Liveness plus the providers this process can reach.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let providers: Vec<&str> = state
        .resolver
        .available()
        .iter()
        .map(|p| p.as_str())
        .collect();

    Json(json!({
        "status": "ok",
        "message": "InsightMatrix Backend V3 Running",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": providers
    }))
}
