//! Route definitions for the Telehub HTTP API.
//!
//! Every remote procedure is a `POST /api/rpc/<Procedure>` taking and
//! returning JSON.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(rpc_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Remote procedures
fn rpc_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rpc/GetServiceMetrics",
            post(handlers::metrics::get_service_metrics),
        )
        .route(
            "/rpc/GetDatabaseMetrics",
            post(handlers::metrics::get_database_metrics),
        )
        .route(
            "/rpc/GetKafkaMetrics",
            post(handlers::metrics::get_kafka_metrics),
        )
        .route("/rpc/CreateUser", post(handlers::user::create_user))
        .route("/rpc/GetUser", post(handlers::user::get_user))
        .route("/rpc/CreateOrder", post(handlers::order::create_order))
}
