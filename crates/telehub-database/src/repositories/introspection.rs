//! Database health introspection reads.

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::result::AppResult;

use crate::transaction::Transaction;

/// Reads activity and size figures from the database's statistics views.
#[derive(Debug, Clone, Default)]
pub struct IntrospectionRepository;

impl IntrospectionRepository {
    /// Create a new introspection repository.
    pub fn new() -> Self {
        Self
    }

    /// Number of connections currently executing a statement.
    pub async fn active_connections(&self, tx: &mut Transaction) -> AppResult<i32> {
        match tx {
            Transaction::Postgres(tx) => {
                let count: i64 = sqlx::query_scalar(
                    "SELECT count(*) FROM pg_stat_activity WHERE state = 'active'",
                )
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read active connections", e)
                })?;
                Ok(clamp_i32(count))
            }
            Transaction::Memory(tx) => tx.active_connections().map(clamp_i32),
        }
    }

    /// On-disk size of the current database in bytes.
    pub async fn database_size(&self, tx: &mut Transaction) -> AppResult<i64> {
        match tx {
            Transaction::Postgres(tx) => {
                sqlx::query_scalar::<_, i64>("SELECT pg_database_size(current_database())")
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to read database size", e)
                    })
            }
            Transaction::Memory(tx) => tx.database_size(),
        }
    }
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDatabase;
    use crate::repositories::UserRepository;

    #[tokio::test]
    async fn test_memory_introspection_counts_open_transactions() {
        let db = MemoryDatabase::new();
        let _other = db.begin().unwrap();
        let mut tx = Transaction::Memory(db.begin().unwrap());

        let repo = IntrospectionRepository::new();
        assert_eq!(repo.active_connections(&mut tx).await.unwrap(), 2);
        assert_eq!(repo.database_size(&mut tx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_database_size_grows_with_committed_rows() {
        let db = MemoryDatabase::new();
        let mut tx = Transaction::Memory(db.begin().unwrap());
        UserRepository::new()
            .create(&mut tx, "Alice", "alice@example.com")
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = Transaction::Memory(db.begin().unwrap());
        let size = IntrospectionRepository::new()
            .database_size(&mut tx)
            .await
            .unwrap();
        assert!(size > 0);
    }

    #[tokio::test]
    async fn test_failing_view_surfaces_database_error() {
        let db = MemoryDatabase::new();
        db.set_introspection_failing(true);
        let mut tx = Transaction::Memory(db.begin().unwrap());

        let err = IntrospectionRepository::new()
            .active_connections(&mut tx)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
