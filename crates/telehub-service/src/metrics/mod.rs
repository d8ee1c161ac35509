//! Metrics reads and resource introspection.

pub mod introspect;
pub mod query;

pub use introspect::{introspect_database, sample_broker};
pub use query::{DatabaseHealth, MetricsQueryService, MonitoredDatabase};
