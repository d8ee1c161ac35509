//! # telehub-service
//!
//! Business logic for Telehub. Ingest services run one pooled transaction
//! per call and report its outcome to the metrics accumulator; the query
//! service serves accumulator snapshots and the latest resource samples.

pub mod metrics;
pub mod order;
pub mod user;

mod report;

pub use metrics::{MetricsQueryService, MonitoredDatabase};
pub use order::OrderService;
pub use user::UserService;
