//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let threshold = state.config.pollers.failure_alert_threshold;
    let pollers: Vec<_> = state.pollers.iter().map(|p| p.current()).collect();
    let databases = state.metrics_query.database_health().await;
    let degraded = pollers.iter().any(|p| p.is_degraded(threshold))
        || databases.iter().any(|d| !d.reachable);

    Json(ApiResponse::ok(HealthResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        pollers,
        databases,
    }))
}
