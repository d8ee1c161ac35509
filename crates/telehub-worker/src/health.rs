//! Poller health reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Where a poller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollerState {
    /// Waiting for the next tick.
    Idle,
    /// Reading the resource.
    Sampling,
    /// Handing the sample to its consumers.
    Publishing,
    /// The loop has exited.
    Stopped,
}

/// Health of one poller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollerHealth {
    /// Poller name.
    pub name: String,
    /// Current state.
    pub state: PollerState,
    /// Failed cycles since the last successful one.
    pub consecutive_failures: u32,
    /// Cycles that published a sample.
    pub completed_cycles: u64,
    /// Cycles that were skipped because sampling failed.
    pub failed_cycles: u64,
    /// When a cycle last succeeded.
    pub last_success: Option<DateTime<Utc>>,
    /// Error of the most recent failed cycle.
    pub last_error: Option<String>,
}

impl PollerHealth {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: PollerState::Idle,
            consecutive_failures: 0,
            completed_cycles: 0,
            failed_cycles: 0,
            last_success: None,
            last_error: None,
        }
    }

    /// Whether the poller is past its alert threshold.
    pub fn is_degraded(&self, threshold: u32) -> bool {
        self.consecutive_failures >= threshold
    }
}

/// Read-only view of a poller's health.
#[derive(Debug, Clone)]
pub struct PollerHealthHandle {
    rx: watch::Receiver<PollerHealth>,
}

impl PollerHealthHandle {
    pub(crate) fn new(rx: watch::Receiver<PollerHealth>) -> Self {
        Self { rx }
    }

    /// Copy of the current health.
    pub fn current(&self) -> PollerHealth {
        self.rx.borrow().clone()
    }

    /// Receiver notified on every health change.
    pub fn subscribe(&self) -> watch::Receiver<PollerHealth> {
        self.rx.clone()
    }
}
