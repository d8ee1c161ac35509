//! Periodic service metrics report.

use std::sync::Arc;

use async_trait::async_trait;
use tracing;

use telehub_core::result::AppResult;
use telehub_metrics::{MetricsAccumulator, ServiceMetricsSnapshot};

use crate::sampler::Sampler;

/// Logs a snapshot of every service's counters.
#[derive(Debug, Clone)]
pub struct ServiceMetricsReporter {
    accumulator: Arc<MetricsAccumulator>,
}

impl ServiceMetricsReporter {
    /// Create a reporter over `accumulator`.
    pub fn new(accumulator: Arc<MetricsAccumulator>) -> Self {
        Self { accumulator }
    }
}

#[async_trait]
impl Sampler for ServiceMetricsReporter {
    type Sample = Vec<ServiceMetricsSnapshot>;

    fn name(&self) -> &str {
        "service-metrics"
    }

    async fn sample(&self) -> AppResult<Self::Sample> {
        Ok(self.accumulator.snapshot_all())
    }

    fn publish(&self, snapshots: Self::Sample) {
        for s in snapshots {
            tracing::info!(
                service = %s.service,
                total = s.total_requests,
                successful = s.successful_requests,
                failed = s.failed_requests,
                avg_latency_ms = s.average_latency_ms,
                "Service metrics"
            );
        }
    }
}
