//! Well-known service, resource, and topic names.

/// Logical service name for user ingest operations.
pub const USER_SERVICE: &str = "user";

/// Logical service name for order ingest operations.
pub const ORDER_SERVICE: &str = "order";

/// Every service registered with the metrics accumulator at startup.
pub const SERVICES: [&str; 2] = [USER_SERVICE, ORDER_SERVICE];

/// Topic that user lifecycle events are published to.
pub const USER_EVENTS_TOPIC: &str = "user-events";
