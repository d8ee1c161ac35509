//! Immutable copies of service counters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Live counters of one service. Only the accumulator mutates these.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub cumulative_latency: Duration,
}

impl Counters {
    pub(crate) fn record(&mut self, succeeded: bool, latency: Duration) {
        self.total += 1;
        if succeeded {
            self.successful += 1;
            self.cumulative_latency += latency;
        } else {
            self.failed += 1;
        }
    }

    pub(crate) fn snapshot(&self, service: &str) -> ServiceMetricsSnapshot {
        let average_latency_ms = if self.successful == 0 {
            0.0
        } else {
            self.cumulative_latency.as_secs_f64() * 1000.0 / self.successful as f64
        };

        ServiceMetricsSnapshot {
            service: service.to_string(),
            total_requests: self.total,
            successful_requests: self.successful,
            failed_requests: self.failed,
            average_latency_ms,
        }
    }
}

/// Point-in-time copy of one service's counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetricsSnapshot {
    /// Service name.
    pub service: String,
    /// Requests recorded.
    pub total_requests: u64,
    /// Requests that succeeded.
    pub successful_requests: u64,
    /// Requests that failed.
    pub failed_requests: u64,
    /// Mean latency of successful requests in milliseconds, 0 with none.
    pub average_latency_ms: f64,
}
