//! A unit of work on a database backend.

use sqlx::Postgres;

use telehub_core::error::{AppError, ErrorKind};

use crate::memory::MemoryTransaction;

/// An open transaction.
///
/// Dropping a transaction without committing rolls it back.
#[derive(Debug)]
pub enum Transaction {
    /// PostgreSQL transaction.
    Postgres(sqlx::Transaction<'static, Postgres>),
    /// In-memory transaction.
    Memory(MemoryTransaction),
}

impl Transaction {
    /// Commit the transaction.
    pub async fn commit(self) -> Result<(), AppError> {
        match self {
            Self::Postgres(tx) => tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
            }),
            Self::Memory(tx) => tx.commit(),
        }
    }

    /// Roll the transaction back.
    pub async fn rollback(self) -> Result<(), AppError> {
        match self {
            Self::Postgres(tx) => tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
            }),
            Self::Memory(tx) => {
                tx.rollback();
                Ok(())
            }
        }
    }
}
