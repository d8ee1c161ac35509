//! Resource samples and the cell holding the latest one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Health figures read from one monitored database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSample {
    /// Connections currently executing a statement.
    pub active_connections: i32,
    /// Database size in bytes.
    pub size_bytes: i64,
    /// When the sample was taken.
    pub sampled_at: DateTime<Utc>,
}

impl DatabaseSample {
    /// Take a sample stamped with the current time.
    pub fn new(active_connections: i32, size_bytes: i64) -> Self {
        Self {
            active_connections,
            size_bytes,
            sampled_at: Utc::now(),
        }
    }

    /// Database size in mebibytes.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }
}

/// Consumer-side figures copied from the broker client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerSample {
    /// Messages consumed.
    pub messages_received: i64,
    /// Payload bytes consumed.
    pub bytes_received: i64,
    /// Messages produced but not yet consumed.
    pub lag: i64,
    /// When the sample was taken.
    pub sampled_at: DateTime<Utc>,
}

/// Holds the most recent sample of one resource.
///
/// Publishing replaces the whole value, so readers see either the previous
/// sample or the new one.
#[derive(Debug)]
pub struct LatestSample<T> {
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for LatestSample<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> LatestSample<T> {
    /// An empty cell.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current sample.
    pub fn publish(&self, sample: T) {
        self.tx.send_replace(Some(sample));
    }

    /// Store `sample` only if nothing has been published yet.
    ///
    /// Returns the sample the cell holds afterwards, which is the earlier
    /// one when the cell was already filled.
    pub fn publish_if_empty(&self, sample: T) -> T {
        let mut held = None;
        self.tx.send_if_modified(|current| {
            if let Some(existing) = current.as_ref() {
                held = Some(existing.clone());
                false
            } else {
                *current = Some(sample.clone());
                true
            }
        });
        held.unwrap_or(sample)
    }

    /// Copy of the current sample, if one was ever published.
    pub fn latest(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for LatestSample<T> {
    fn default() -> Self {
        Self::new()
    }
}
