//! # telehub-metrics
//!
//! Per-service request accounting and the latest-sample cells that the
//! background pollers publish into.

pub mod accumulator;
pub mod sample;
pub mod snapshot;
pub mod timer;

pub use accumulator::MetricsAccumulator;
pub use sample::{BrokerSample, DatabaseSample, LatestSample};
pub use snapshot::ServiceMetricsSnapshot;
pub use timer::OutcomeTimer;
