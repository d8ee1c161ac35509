//! Publish retry policy.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use telehub_core::config::RetryConfig;
use telehub_core::error::AppError;
use telehub_core::result::AppResult;

use crate::client::BrokerClient;

/// Delay to wait after a failed attempt.
pub trait Backoff: Send + Sync + Debug {
    /// Delay after failed attempt number `attempt` (1-based).
    fn delay(&self, attempt: u32) -> Duration;
}

/// Waits `step × attempt` after each failure.
#[derive(Debug, Clone, Copy)]
pub struct LinearBackoff {
    /// Delay after the first failure.
    pub step: Duration,
}

impl Backoff for LinearBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt)
    }
}

/// Bounded publish retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Arc<dyn Backoff>,
}

impl RetryPolicy {
    /// Create a policy making at most `max_attempts` attempts.
    pub fn new(max_attempts: u32, backoff: Arc<dyn Backoff>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Linear policy from configuration.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Arc::new(LinearBackoff {
                step: Duration::from_millis(config.backoff_step_ms),
            }),
        )
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Publish through `client`, retrying failed attempts.
    ///
    /// Returns the number of attempts used. No delay follows the final
    /// failed attempt.
    pub async fn publish(
        &self,
        client: &dyn BrokerClient,
        topic: &str,
        key: &str,
        value: &str,
    ) -> AppResult<u32> {
        let mut attempt = 1;
        loop {
            match client.publish(topic, key, value).await {
                Ok(()) => return Ok(attempt),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(topic, key, attempts = attempt, error = %e, "Giving up on publish");
                    return Err(AppError::publish_failure(format!(
                        "failed to publish to {topic} after {attempt} attempts: {}",
                        e.message
                    )));
                }
                Err(e) => {
                    let delay = self.backoff.delay(attempt);
                    warn!(
                        topic,
                        key,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Publish failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
