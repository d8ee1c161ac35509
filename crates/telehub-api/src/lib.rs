//! # telehub-api
//!
//! HTTP layer for Telehub built on Axum.
//!
//! Exposes one JSON route per remote procedure under `/api/rpc`, a health
//! endpoint, request logging and CORS middleware, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
