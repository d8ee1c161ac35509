//! Request timer that reports its outcome exactly once.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use telehub_core::result::AppResult;

use crate::accumulator::MetricsAccumulator;

/// Measures one request from entry until its outcome is known.
///
/// Call [`OutcomeTimer::finish`] once the outcome is known. A timer dropped
/// unfinished, for example because the request future was cancelled, is
/// recorded as a failure.
#[derive(Debug)]
pub struct OutcomeTimer {
    accumulator: Arc<MetricsAccumulator>,
    service: String,
    started: Instant,
    finished: bool,
}

impl OutcomeTimer {
    /// Start timing now.
    pub fn start(accumulator: Arc<MetricsAccumulator>, service: &str) -> Self {
        Self {
            accumulator,
            service: service.to_string(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Time elapsed since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Record the outcome and return the measured latency.
    pub fn finish(mut self, succeeded: bool) -> AppResult<Duration> {
        self.finished = true;
        let latency = self.elapsed();
        self.accumulator
            .record_outcome(&self.service, succeeded, latency)?;
        Ok(latency)
    }
}

impl Drop for OutcomeTimer {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let latency = self.elapsed();
        warn!(service = %self.service, "Request abandoned before completion");
        if let Err(e) = self.accumulator.record_outcome(&self.service, false, latency) {
            warn!(service = %self.service, error = %e, "Failed to record abandoned request");
        }
    }
}
