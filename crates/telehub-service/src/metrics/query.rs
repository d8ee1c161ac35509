//! Metric reads over the accumulator and the latest resource samples.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use telehub_broker::BrokerClient;
use telehub_core::error::AppError;
use telehub_core::result::AppResult;
use telehub_database::{PoolStatus, SessionPool};
use telehub_metrics::{
    BrokerSample, DatabaseSample, LatestSample, MetricsAccumulator, ServiceMetricsSnapshot,
};

use super::introspect::{introspect_database, sample_broker};

/// Admission state and reachability of one monitored database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// Pool admission state.
    #[serde(flatten)]
    pub pool: PoolStatus,
    /// Whether the database answered a connectivity check.
    pub reachable: bool,
}

/// A database the pollers sample, with the cell they publish into.
#[derive(Debug, Clone)]
pub struct MonitoredDatabase {
    /// Session pool of the database.
    pub pool: Arc<SessionPool>,
    /// Most recent sample.
    pub latest: LatestSample<DatabaseSample>,
}

impl MonitoredDatabase {
    /// Monitor `pool`, starting with no sample.
    pub fn new(pool: Arc<SessionPool>) -> Self {
        Self {
            pool,
            latest: LatestSample::new(),
        }
    }
}

/// Serves accumulator snapshots and latest resource samples.
#[derive(Debug, Clone)]
pub struct MetricsQueryService {
    accumulator: Arc<MetricsAccumulator>,
    databases: HashMap<String, MonitoredDatabase>,
    broker: Arc<dyn BrokerClient>,
    broker_latest: LatestSample<BrokerSample>,
}

impl MetricsQueryService {
    /// Creates a new metrics query service.
    pub fn new(
        accumulator: Arc<MetricsAccumulator>,
        databases: HashMap<String, MonitoredDatabase>,
        broker: Arc<dyn BrokerClient>,
        broker_latest: LatestSample<BrokerSample>,
    ) -> Self {
        Self {
            accumulator,
            databases,
            broker,
            broker_latest,
        }
    }

    /// Counters of one service.
    pub fn get_service_metrics(&self, service: &str) -> AppResult<ServiceMetricsSnapshot> {
        self.accumulator.snapshot(service)
    }

    /// Counters of every service.
    pub fn get_all_service_metrics(&self) -> Vec<ServiceMetricsSnapshot> {
        self.accumulator.snapshot_all()
    }

    /// Latest sample of a monitored database.
    ///
    /// Before the first poll completes a fresh read is taken. It fills the
    /// cell only if no poller sample arrived in the meantime.
    pub async fn get_database_metrics(&self, resource: &str) -> AppResult<DatabaseSample> {
        let monitored = self
            .databases
            .get(resource)
            .ok_or_else(|| AppError::unknown_resource(resource))?;

        if let Some(sample) = monitored.latest.latest() {
            return Ok(sample);
        }

        debug!(resource, "No database sample yet, reading directly");
        let sample = introspect_database(&monitored.pool).await?;
        Ok(monitored.latest.publish_if_empty(sample))
    }

    /// Health of every monitored database, ordered by name.
    pub async fn database_health(&self) -> Vec<DatabaseHealth> {
        let mut health = Vec::with_capacity(self.databases.len());
        for monitored in self.databases.values() {
            let pool = &monitored.pool;
            let reachable = match pool.backend().health_check().await {
                Ok(reachable) => reachable,
                Err(e) => {
                    warn!(pool = pool.name(), error = %e, "Database health check failed");
                    false
                }
            };
            health.push(DatabaseHealth {
                pool: pool.status(),
                reachable,
            });
        }
        health.sort_by(|a, b| a.pool.name.cmp(&b.pool.name));
        health
    }

    /// Latest broker sample, or the client's current counters before the
    /// first poll.
    pub fn get_broker_metrics(&self) -> BrokerSample {
        self.broker_latest
            .latest()
            .unwrap_or_else(|| sample_broker(self.broker.as_ref()))
    }
}
