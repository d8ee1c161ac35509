//! Background poller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sampling intervals for the background pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Whether pollers are started at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval between database introspection samples, in milliseconds.
    #[serde(default = "default_database_interval")]
    pub database_interval_ms: u64,
    /// Interval between broker stats samples, in milliseconds.
    #[serde(default = "default_broker_interval")]
    pub broker_interval_ms: u64,
    /// Interval between service metrics reports, in milliseconds.
    #[serde(default = "default_report_interval")]
    pub report_interval_ms: u64,
    /// Consecutive failed cycles before a poller logs at error severity.
    #[serde(default = "default_failure_alert_threshold")]
    pub failure_alert_threshold: u32,
}

impl PollerConfig {
    /// Database sampling interval.
    pub fn database_interval(&self) -> Duration {
        Duration::from_millis(self.database_interval_ms)
    }

    /// Broker sampling interval.
    pub fn broker_interval(&self) -> Duration {
        Duration::from_millis(self.broker_interval_ms)
    }

    /// Service report interval.
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            database_interval_ms: default_database_interval(),
            broker_interval_ms: default_broker_interval(),
            report_interval_ms: default_report_interval(),
            failure_alert_threshold: default_failure_alert_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_database_interval() -> u64 {
    1000
}

fn default_broker_interval() -> u64 {
    5000
}

fn default_report_interval() -> u64 {
    1000
}

fn default_failure_alert_threshold() -> u32 {
    3
}
