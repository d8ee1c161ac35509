//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use telehub_core::config::AppConfig;
use telehub_service::{MetricsQueryService, OrderService, UserService};
use telehub_worker::PollerHealthHandle;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// Services are `Arc`-wrapped so the state clones cheaply across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// User ingest
    pub user_service: Arc<UserService>,
    /// Order ingest
    pub order_service: Arc<OrderService>,
    /// Metric reads
    pub metrics_query: Arc<MetricsQueryService>,
    /// Health views of the running pollers
    pub pollers: Arc<Vec<PollerHealthHandle>>,
    /// When the server started
    pub started_at: Instant,
}
