//! In-memory broker for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use telehub_core::error::AppError;
use telehub_core::result::AppResult;

use crate::client::{BrokerClient, BrokerStats};
use crate::message::BrokerMessage;

#[derive(Debug, Default)]
struct Counters {
    produced: AtomicI64,
    consumed: AtomicI64,
    consumed_bytes: AtomicI64,
}

/// In-memory broker with one broadcast channel per topic.
#[derive(Debug)]
pub struct MemoryBroker {
    /// Topic name → broadcast sender
    topics: RwLock<HashMap<String, broadcast::Sender<BrokerMessage>>>,
    /// Buffer size for topic channels
    buffer_size: usize,
    counters: Arc<Counters>,
    available: AtomicBool,
}

impl MemoryBroker {
    /// Create a broker whose topics buffer up to `buffer_size` messages.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            buffer_size: buffer_size.max(1),
            counters: Arc::new(Counters::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the broker going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Subscribe to a topic, creating it if needed.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<BrokerMessage> {
        let mut topics = self.topics.write().await;
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Start a consumer for `topic` that runs until `cancel` flips to true.
    ///
    /// The subscription is taken before this returns, so messages published
    /// afterwards are always seen by the consumer.
    pub async fn spawn_consumer(
        &self,
        topic: &str,
        group_id: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let mut rx = self.subscribe(topic).await;
        let counters = Arc::clone(&self.counters);
        let topic = topic.to_string();
        let group_id = group_id.to_string();

        info!(topic = %topic, group_id = %group_id, "Broker consumer started");

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.changed() => {
                        if *cancel.borrow() {
                            break;
                        }
                    }
                    received = rx.recv() => match received {
                        Ok(msg) => {
                            counters.consumed.fetch_add(1, Ordering::Relaxed);
                            counters
                                .consumed_bytes
                                .fetch_add(msg.size() as i64, Ordering::Relaxed);
                            info!(
                                topic = %msg.topic,
                                group_id = %group_id,
                                key = %String::from_utf8_lossy(&msg.key),
                                value = %String::from_utf8_lossy(&msg.value),
                                "Consumed message"
                            );
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(topic = %topic, skipped, "Broker consumer fell behind");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            info!(topic = %topic, group_id = %group_id, "Broker consumer stopped");
        })
    }
}

#[async_trait]
impl BrokerClient for MemoryBroker {
    async fn publish(&self, topic: &str, key: &str, value: &str) -> AppResult<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AppError::publish_failure("broker is unavailable"));
        }

        let msg = BrokerMessage::new(topic, key, value);
        let topics = self.topics.read().await;
        match topics.get(topic) {
            Some(tx) => {
                self.counters.produced.fetch_add(1, Ordering::Relaxed);
                if tx.send(msg).is_err() {
                    debug!(topic, "Published with no active consumers");
                }
            }
            None => {
                drop(topics);
                self.topics
                    .write()
                    .await
                    .entry(topic.to_string())
                    .or_insert_with(|| broadcast::channel(self.buffer_size).0);
                self.counters.produced.fetch_add(1, Ordering::Relaxed);
                debug!(topic, "Published to a topic with no consumers");
            }
        }
        Ok(())
    }

    fn stats(&self) -> BrokerStats {
        let produced = self.counters.produced.load(Ordering::Relaxed);
        let consumed = self.counters.consumed.load(Ordering::Relaxed);
        BrokerStats {
            messages_received: consumed,
            bytes_received: self.counters.consumed_bytes.load(Ordering::Relaxed),
            lag: (produced - consumed).max(0),
        }
    }
}
