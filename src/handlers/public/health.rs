use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /health - liveness plus a database ping
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    DatabaseManager::health_check(&state.pool).await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    })))
}
