//! Health check HTTP handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use crate::web::{responses::HealthResponse, AppState};

/// Reports healthy only while the database answers `SELECT 1`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy()),
            )
        }
    }
}
