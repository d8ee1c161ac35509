//! Message broker configuration.

use serde::{Deserialize, Serialize};

/// Broker client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Broker provider. Only `"memory"` ships in-tree.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Topic the service publishes user events to and consumes from.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Consumer group identifier.
    #[serde(default = "default_group_id")]
    pub group_id: String,
    /// Per-topic buffer capacity.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Publish retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Linear-backoff publish retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total publish attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff step in milliseconds; attempt `n` waits `n * step`.
    #[serde(default = "default_backoff_step")]
    pub backoff_step_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            topic: default_topic(),
            group_id: default_group_id(),
            buffer_size: default_buffer_size(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_step_ms: default_backoff_step(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_topic() -> String {
    crate::types::names::USER_EVENTS_TOPIC.to_string()
}

fn default_group_id() -> String {
    "monitoring-service".to_string()
}

fn default_buffer_size() -> usize {
    1024
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_step() -> u64 {
    100
}
