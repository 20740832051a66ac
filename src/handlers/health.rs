// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Service banner at the root path.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Encore resale intelligence API",
        "health": "/health",
    }))
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
