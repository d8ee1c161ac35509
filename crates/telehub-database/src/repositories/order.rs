//! Order repository implementation.

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::result::AppResult;

use crate::models::Order;
use crate::transaction::Transaction;

/// Repository for the `orders` table.
#[derive(Debug, Clone, Default)]
pub struct OrderRepository;

impl OrderRepository {
    /// Create a new order repository.
    pub fn new() -> Self {
        Self
    }

    /// Insert an order and return the generated key.
    pub async fn create(&self, tx: &mut Transaction, user_id: i64, product: &str) -> AppResult<i64> {
        match tx {
            Transaction::Postgres(tx) => sqlx::query_scalar::<_, i64>(
                "INSERT INTO orders (user_id, product) VALUES ($1, $2) RETURNING id",
            )
            .bind(user_id)
            .bind(product)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create order", e)),
            Transaction::Memory(tx) => Ok(tx.insert_order(user_id, product)),
        }
    }

    /// Find an order by primary key.
    pub async fn find_by_id(&self, tx: &mut Transaction, id: i64) -> AppResult<Option<Order>> {
        match tx {
            Transaction::Postgres(tx) => {
                sqlx::query_as::<_, Order>("SELECT id, user_id, product FROM orders WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to find order by id", e)
                    })
            }
            Transaction::Memory(tx) => Ok(tx.find_order(id)),
        }
    }
}
