//! The sampling half of a poller.

use async_trait::async_trait;

use telehub_core::result::AppResult;

/// Reads one resource and hands the result to its consumers.
#[async_trait]
pub trait Sampler: Send + Sync {
    /// What one read produces.
    type Sample: Send;

    /// Name used in logs and health reports.
    fn name(&self) -> &str;

    /// Read the resource once.
    async fn sample(&self) -> AppResult<Self::Sample>;

    /// Publish a successful read.
    fn publish(&self, sample: Self::Sample);
}
