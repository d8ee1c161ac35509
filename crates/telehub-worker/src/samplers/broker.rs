//! Broker consumer sampler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing;

use telehub_broker::BrokerClient;
use telehub_core::result::AppResult;
use telehub_metrics::{BrokerSample, LatestSample};
use telehub_service::metrics::sample_broker;

use crate::sampler::Sampler;

/// Copies the broker client's consumer counters.
#[derive(Debug, Clone)]
pub struct BrokerSampler {
    client: Arc<dyn BrokerClient>,
    latest: LatestSample<BrokerSample>,
}

impl BrokerSampler {
    /// Create a sampler publishing into `latest`.
    pub fn new(client: Arc<dyn BrokerClient>, latest: LatestSample<BrokerSample>) -> Self {
        Self { client, latest }
    }
}

#[async_trait]
impl Sampler for BrokerSampler {
    type Sample = BrokerSample;

    fn name(&self) -> &str {
        "broker"
    }

    async fn sample(&self) -> AppResult<BrokerSample> {
        Ok(sample_broker(self.client.as_ref()))
    }

    fn publish(&self, sample: BrokerSample) {
        tracing::info!(
            messages_received = sample.messages_received,
            bytes_received = sample.bytes_received,
            lag = sample.lag,
            "Broker metrics"
        );
        self.latest.publish(sample);
    }
}
