use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use cms_infrastructure::check_connection;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let pool = state
        .db
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("Database is not configured".to_string()))?;

    check_connection(pool)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Database is unreachable: {}", e)))?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
