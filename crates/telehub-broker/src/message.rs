//! Broker message envelope.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// One message on a topic.
#[derive(Debug, Clone)]
pub struct BrokerMessage {
    /// Topic the message was produced to.
    pub topic: String,
    /// Partitioning key.
    pub key: Bytes,
    /// Payload.
    pub value: Bytes,
    /// When the message was produced.
    pub produced_at: DateTime<Utc>,
}

impl BrokerMessage {
    /// Build a message stamped with the current time.
    pub fn new(topic: &str, key: &str, value: &str) -> Self {
        Self {
            topic: topic.to_string(),
            key: Bytes::copy_from_slice(key.as_bytes()),
            value: Bytes::copy_from_slice(value.as_bytes()),
            produced_at: Utc::now(),
        }
    }

    /// Payload length in bytes.
    pub fn size(&self) -> usize {
        self.value.len()
    }
}
