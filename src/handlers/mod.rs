//! API handlers for the ReWear backend

pub mod admin;
pub mod dashboard;
pub mod items;
pub mod points;
pub mod swaps;
pub mod users;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::app_state::AppState;
use crate::models::ApiResponse;

/// Liveness check with a database ping.
pub async fn health_check(
    State(app_state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => Ok(Json(json!({
            "status": "ok",
            "message": "ReWear API is running",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))),
        Err(e) => {
            tracing::error!(error = %e, "health check database ping failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Database connection failed",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })),
            ))
        }
    }
}

/// Validate a payload, folding field errors into a single message.
pub(crate) fn validate_payload<T: validator::Validate>(
    payload: &T,
) -> Result<(), crate::error::ApiError> {
    payload.validate().map_err(|e| {
        crate::error::ApiError::Validation(format!("Validation error: {}", e).replace('\n', "; "))
    })
}

/// Shorthand for the success envelope.
pub(crate) fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}
