//! Built-in samplers.

pub mod broker;
pub mod database;
pub mod reporter;

pub use broker::BrokerSampler;
pub use database::DatabaseSampler;
pub use reporter::ServiceMetricsReporter;
