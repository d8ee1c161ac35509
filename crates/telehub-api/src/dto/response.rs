//! Response DTOs.

use serde::{Deserialize, Serialize};

use telehub_metrics::{BrokerSample, DatabaseSample, ServiceMetricsSnapshot};
use telehub_service::metrics::DatabaseHealth;
use telehub_worker::PollerHealth;

/// Outcome marker for ingest responses.
pub const STATUS_SUCCESS: &str = "success";
/// Outcome marker for ingest responses.
pub const STATUS_ERROR: &str = "error";

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// GetServiceMetrics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMetricsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_latency_ms: f64,
}

impl From<ServiceMetricsSnapshot> for ServiceMetricsResponse {
    fn from(s: ServiceMetricsSnapshot) -> Self {
        Self {
            total_requests: s.total_requests,
            successful_requests: s.successful_requests,
            failed_requests: s.failed_requests,
            average_latency_ms: s.average_latency_ms,
        }
    }
}

/// GetDatabaseMetrics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseMetricsResponse {
    pub active_connections: i32,
    pub database_size_mb: f64,
}

impl From<DatabaseSample> for DatabaseMetricsResponse {
    fn from(s: DatabaseSample) -> Self {
        Self {
            active_connections: s.active_connections,
            database_size_mb: s.size_mb(),
        }
    }
}

/// GetKafkaMetrics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaMetricsResponse {
    pub messages_received: i64,
    pub bytes_received: i64,
    pub lag: i64,
}

impl From<BrokerSample> for KafkaMetricsResponse {
    fn from(s: BrokerSample) -> Self {
        Self {
            messages_received: s.messages_received,
            bytes_received: s.bytes_received,
            lag: s.lag,
        }
    }
}

/// CreateUser response. Failures are reported in `status` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: i64,
    pub status: String,
    pub error: String,
}

/// GetUser response. `error` is empty when the user was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub error: String,
}

/// CreateOrder response. Failures are reported in `status` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: i64,
    pub status: String,
    pub error: String,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when a poller is past its alert threshold or a
    /// database is unreachable.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Health of every poller.
    pub pollers: Vec<PollerHealth>,
    /// Admission state and reachability of every monitored database.
    pub databases: Vec<DatabaseHealth>,
}
