//! Fresh reads of resource health.

use chrono::Utc;
use tracing::warn;

use telehub_broker::BrokerClient;
use telehub_core::error::AppError;
use telehub_core::result::AppResult;
use telehub_core::types::Outcome;
use telehub_database::SessionPool;
use telehub_database::repositories::IntrospectionRepository;
use telehub_metrics::{BrokerSample, DatabaseSample};

/// Read active connections and size through a pooled session.
///
/// The session is released with a success outcome whether or not the reads
/// succeed; the read error, if any, is returned.
pub async fn introspect_database(pool: &SessionPool) -> AppResult<DatabaseSample> {
    let repo = IntrospectionRepository::new();
    let mut session = pool.acquire().await?;

    let read = async {
        let active = repo.active_connections(session.tx()).await?;
        let size = repo.database_size(session.tx()).await?;
        Ok::<_, AppError>(DatabaseSample::new(active, size))
    }
    .await;

    if let Err(e) = session.release(Outcome::Success).await {
        warn!(pool = pool.name(), error = %e, "Failed to release introspection session");
    }
    read
}

/// Copy the broker client's consumer counters into a sample.
pub fn sample_broker(client: &dyn BrokerClient) -> BrokerSample {
    let stats = client.stats();
    BrokerSample {
        messages_received: stats.messages_received,
        bytes_received: stats.bytes_received,
        lag: stats.lag,
        sampled_at: Utc::now(),
    }
}
