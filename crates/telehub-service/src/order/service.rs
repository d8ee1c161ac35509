//! Order ingest.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use telehub_core::error::AppError;
use telehub_core::result::AppResult;
use telehub_core::types::Outcome;
use telehub_core::types::names::ORDER_SERVICE;
use telehub_database::SessionPool;
use telehub_database::repositories::OrderRepository;
use telehub_metrics::MetricsAccumulator;

use crate::report::report;

/// Data for creating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Ordering user.
    pub user_id: i64,
    /// Ordered product.
    pub product: String,
}

/// Handles order ingest against the order database.
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: Arc<SessionPool>,
    orders: OrderRepository,
    accumulator: Arc<MetricsAccumulator>,
}

impl OrderService {
    /// Creates a new order service.
    pub fn new(pool: Arc<SessionPool>, accumulator: Arc<MetricsAccumulator>) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(),
            accumulator,
        }
    }

    /// Persist an order and return its id.
    pub async fn create_order(&self, req: CreateOrderRequest) -> AppResult<i64> {
        let timer = self.accumulator.start_timer(ORDER_SERVICE);
        let result = self.insert(&req).await;
        report(timer, &result, "create_order");
        result
    }

    async fn insert(&self, req: &CreateOrderRequest) -> AppResult<i64> {
        if req.product.trim().is_empty() {
            return Err(AppError::validation("Product cannot be empty"));
        }

        let mut session = self.pool.acquire().await?;
        let inserted = self
            .orders
            .create(session.tx(), req.user_id, &req.product)
            .await;
        let released = session.release(Outcome::of(&inserted)).await;
        let order_id = inserted?;
        released?;

        info!(order_id, user_id = req.user_id, product = %req.product, "Order created");
        Ok(order_id)
    }
}
