//! Poller runner: paces a sampler until the cancel signal is received.

use chrono::Utc;
use tokio::sync::watch;
use tracing;

use telehub_core::result::AppResult;

use crate::health::{PollerHealth, PollerHealthHandle, PollerState};
use crate::sampler::Sampler;
use crate::ticker::TickSource;

/// Drives one sampler through `Idle → Sampling → Publishing → Idle` cycles.
#[derive(Debug)]
pub struct PollerRunner<S> {
    /// The resource reader
    sampler: S,
    /// What wakes the poller
    ticker: TickSource,
    /// Consecutive failures at which failures are logged as errors
    alert_threshold: u32,
    /// Health published to readers
    health: watch::Sender<PollerHealth>,
}

impl<S: Sampler> PollerRunner<S> {
    /// Create a runner for `sampler` paced by `ticker`.
    pub fn new(sampler: S, ticker: TickSource, alert_threshold: u32) -> Self {
        let (health, _rx) = watch::channel(PollerHealth::new(sampler.name()));
        Self {
            sampler,
            ticker,
            alert_threshold: alert_threshold.max(1),
            health,
        }
    }

    /// Read-only view of this poller's health.
    pub fn health(&self) -> PollerHealthHandle {
        PollerHealthHandle::new(self.health.subscribe())
    }

    /// Run until `cancel` flips to true or the tick source is exhausted.
    ///
    /// Shutdown is observed while waiting for a tick; a cycle in progress
    /// runs to completion.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        tracing::info!("Poller '{}' started", self.sampler.name());

        loop {
            if *cancel.borrow() {
                break;
            }

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                ticked = self.ticker.tick() => {
                    if !ticked {
                        break;
                    }
                    let _ = self.run_cycle().await;
                }
            }
        }

        self.set_state(PollerState::Stopped);
        tracing::info!("Poller '{}' stopped", self.sampler.name());
    }

    /// Run one sample-and-publish cycle.
    ///
    /// A failed read is logged and the cycle skipped; the error is returned
    /// for callers that drive cycles directly.
    pub async fn run_cycle(&self) -> AppResult<()> {
        self.set_state(PollerState::Sampling);

        match self.sampler.sample().await {
            Ok(sample) => {
                self.set_state(PollerState::Publishing);
                self.sampler.publish(sample);
                self.health.send_modify(|h| {
                    h.state = PollerState::Idle;
                    h.consecutive_failures = 0;
                    h.completed_cycles += 1;
                    h.last_success = Some(Utc::now());
                    h.last_error = None;
                });
                Ok(())
            }
            Err(e) => {
                let mut failures = 0;
                self.health.send_modify(|h| {
                    h.state = PollerState::Idle;
                    h.consecutive_failures += 1;
                    h.failed_cycles += 1;
                    h.last_error = Some(e.to_string());
                    failures = h.consecutive_failures;
                });

                if failures >= self.alert_threshold {
                    tracing::error!(
                        "Poller '{}' failed {} consecutive cycles: {}",
                        self.sampler.name(),
                        failures,
                        e
                    );
                } else {
                    tracing::warn!("Poller '{}' cycle skipped: {}", self.sampler.name(), e);
                }
                Err(e)
            }
        }
    }

    fn set_state(&self, state: PollerState) {
        self.health.send_modify(|h| h.state = state);
    }
}
