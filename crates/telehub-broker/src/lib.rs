//! # telehub-broker
//!
//! The message broker seam: a [`BrokerClient`] trait with an in-memory
//! implementation that runs its own consumer, and the retry policy used
//! when publishing events.

pub mod client;
pub mod memory;
pub mod message;
pub mod retry;

use std::sync::Arc;

use tracing::info;

use telehub_core::config::BrokerConfig;
use telehub_core::error::AppError;

pub use client::{BrokerClient, BrokerStats};
pub use memory::MemoryBroker;
pub use message::BrokerMessage;
pub use retry::{Backoff, LinearBackoff, RetryPolicy};

/// Build the configured broker.
pub fn from_config(config: &BrokerConfig) -> Result<Arc<MemoryBroker>, AppError> {
    match config.provider.as_str() {
        "memory" => {
            info!(buffer_size = config.buffer_size, "Using in-memory broker");
            Ok(Arc::new(MemoryBroker::new(config.buffer_size)))
        }
        other => Err(AppError::configuration(format!(
            "Unsupported broker provider: {other}"
        ))),
    }
}
