//! Route handlers, one module per resource.

pub mod matches;
pub mod players;
pub mod stats;
pub mod teams;

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "scorebook API is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
