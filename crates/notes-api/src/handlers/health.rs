//! Service health checks.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use notes_db::log_pool_metrics;

use crate::AppState;

/// Liveness probe.
///
/// GET /
#[utoipa::path(get, path = "/", tag = "Health",
    responses((status = 200, description = "Service is up")))]
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Healthy" }))
}

/// Liveness probe with build version. Also logs connection pool metrics.
///
/// GET /health
#[utoipa::path(get, path = "/health", tag = "Health",
    responses((status = 200, description = "Service is up")))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    log_pool_metrics(state.db.pool());
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
