//! User repository implementation.

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::result::AppResult;

use crate::models::User;
use crate::transaction::Transaction;

/// Repository for the `users` table.
#[derive(Debug, Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    /// Create a new user repository.
    pub fn new() -> Self {
        Self
    }

    /// Insert a user and return the generated key.
    pub async fn create(&self, tx: &mut Transaction, name: &str, email: &str) -> AppResult<i64> {
        match tx {
            Transaction::Postgres(tx) => {
                sqlx::query_scalar::<_, i64>(
                    "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id",
                )
                .bind(name)
                .bind(email)
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create user", e))
            }
            Transaction::Memory(tx) => Ok(tx.insert_user(name, email)),
        }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, tx: &mut Transaction, id: i64) -> AppResult<Option<User>> {
        match tx {
            Transaction::Postgres(tx) => {
                sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to find user by id", e)
                    })
            }
            Transaction::Memory(tx) => Ok(tx.find_user(id)),
        }
    }
}
