//! Per-service outcome accumulator.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::trace;

use telehub_core::error::AppError;
use telehub_core::result::AppResult;

use crate::snapshot::{Counters, ServiceMetricsSnapshot};
use crate::timer::OutcomeTimer;

/// Accumulates request outcomes for a fixed set of services.
///
/// Services are registered at construction and never removed. One lock
/// guards every service and is held only for the counter arithmetic.
#[derive(Debug)]
pub struct MetricsAccumulator {
    services: RwLock<HashMap<String, Counters>>,
}

impl MetricsAccumulator {
    /// Create an accumulator with zeroed counters for each service.
    pub fn new<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let services = services
            .into_iter()
            .map(|name| (name.into(), Counters::default()))
            .collect();
        Self {
            services: RwLock::new(services),
        }
    }

    /// Record the outcome of one request.
    ///
    /// Latency is only accumulated for successful requests.
    pub fn record_outcome(&self, service: &str, succeeded: bool, latency: Duration) -> AppResult<()> {
        let mut services = self
            .services
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let counters = services
            .get_mut(service)
            .ok_or_else(|| AppError::unknown_service(service))?;
        counters.record(succeeded, latency);
        drop(services);

        trace!(service, succeeded, latency_ms = latency.as_millis() as u64, "Outcome recorded");
        Ok(())
    }

    /// Copy of one service's counters.
    pub fn snapshot(&self, service: &str) -> AppResult<ServiceMetricsSnapshot> {
        let services = self.services.read().unwrap_or_else(PoisonError::into_inner);
        services
            .get(service)
            .map(|counters| counters.snapshot(service))
            .ok_or_else(|| AppError::unknown_service(service))
    }

    /// Copies of every registered service's counters, ordered by name.
    pub fn snapshot_all(&self) -> Vec<ServiceMetricsSnapshot> {
        let services = self.services.read().unwrap_or_else(PoisonError::into_inner);
        let mut snapshots: Vec<_> = services
            .iter()
            .map(|(name, counters)| counters.snapshot(name))
            .collect();
        drop(services);
        snapshots.sort_by(|a, b| a.service.cmp(&b.service));
        snapshots
    }

    /// Whether `service` was registered.
    pub fn is_registered(&self, service: &str) -> bool {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(service)
    }

    /// Start timing one request of `service`.
    pub fn start_timer(self: &Arc<Self>, service: &str) -> OutcomeTimer {
        OutcomeTimer::start(Arc::clone(self), service)
    }
}
