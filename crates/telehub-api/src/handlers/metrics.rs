//! Metric read handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{GetDatabaseMetricsRequest, GetServiceMetricsRequest};
use crate::dto::response::{DatabaseMetricsResponse, KafkaMetricsResponse, ServiceMetricsResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/rpc/GetServiceMetrics
pub async fn get_service_metrics(
    State(state): State<AppState>,
    Json(req): Json<GetServiceMetricsRequest>,
) -> Result<Json<ServiceMetricsResponse>, ApiError> {
    let snapshot = state.metrics_query.get_service_metrics(&req.service_name)?;
    Ok(Json(snapshot.into()))
}

/// POST /api/rpc/GetDatabaseMetrics
pub async fn get_database_metrics(
    State(state): State<AppState>,
    Json(req): Json<GetDatabaseMetricsRequest>,
) -> Result<Json<DatabaseMetricsResponse>, ApiError> {
    let sample = state
        .metrics_query
        .get_database_metrics(&req.service_name)
        .await?;
    Ok(Json(sample.into()))
}

/// POST /api/rpc/GetKafkaMetrics
///
/// Takes no arguments, so any request body is ignored.
pub async fn get_kafka_metrics(State(state): State<AppState>) -> Json<KafkaMetricsResponse> {
    Json(state.metrics_query.get_broker_metrics().into())
}
