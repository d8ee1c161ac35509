//! Database health sampler.

use async_trait::async_trait;
use tracing;

use telehub_core::result::AppResult;
use telehub_metrics::DatabaseSample;
use telehub_service::MonitoredDatabase;
use telehub_service::metrics::introspect_database;

use crate::sampler::Sampler;

/// Samples active connections and size of one database through its pool.
#[derive(Debug, Clone)]
pub struct DatabaseSampler {
    name: String,
    database: MonitoredDatabase,
}

impl DatabaseSampler {
    /// Create a sampler for the database registered as `resource`.
    pub fn new(resource: &str, database: MonitoredDatabase) -> Self {
        Self {
            name: format!("database:{resource}"),
            database,
        }
    }
}

#[async_trait]
impl Sampler for DatabaseSampler {
    type Sample = DatabaseSample;

    fn name(&self) -> &str {
        &self.name
    }

    async fn sample(&self) -> AppResult<DatabaseSample> {
        introspect_database(&self.database.pool).await
    }

    fn publish(&self, sample: DatabaseSample) {
        tracing::info!(
            resource = self.database.pool.name(),
            active_connections = sample.active_connections,
            size_mb = sample.size_mb(),
            "Database metrics"
        );
        self.database.latest.publish(sample);
    }
}
