//! Order ingest.

pub mod service;

pub use service::{CreateOrderRequest, OrderService};
