//! Broker client abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use telehub_core::result::AppResult;

/// Consumer-side counters kept by a broker client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerStats {
    /// Messages consumed.
    pub messages_received: i64,
    /// Payload bytes consumed.
    pub bytes_received: i64,
    /// Messages produced but not yet consumed.
    pub lag: i64,
}

/// A message broker the service publishes events to.
///
/// Publishing is a single attempt; callers own the retry policy.
#[async_trait]
pub trait BrokerClient: Send + Sync + std::fmt::Debug {
    /// Publish one message.
    async fn publish(&self, topic: &str, key: &str, value: &str) -> AppResult<()>;

    /// Current consumer-side counters.
    fn stats(&self) -> BrokerStats;
}
