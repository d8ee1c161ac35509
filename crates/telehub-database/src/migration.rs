//! Database migration runner.

use tracing::info;

use telehub_core::error::{AppError, ErrorKind};
use telehub_core::types::names::{ORDER_SERVICE, USER_SERVICE};

use crate::connection::DatabaseBackend;

/// Schemas owned by the monitored databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// The `users` table.
    Users,
    /// The `orders` table.
    Orders,
}

impl Schema {
    /// Schema owned by the named resource, if any.
    pub fn for_resource(resource: &str) -> Option<Self> {
        match resource {
            USER_SERVICE => Some(Self::Users),
            ORDER_SERVICE => Some(Self::Orders),
            _ => None,
        }
    }
}

/// Run all pending migrations of `schema` against the backend.
pub async fn run_migrations(backend: &DatabaseBackend, schema: Schema) -> Result<(), AppError> {
    let pool = match backend {
        DatabaseBackend::Postgres(pool) => pool,
        DatabaseBackend::Memory(_) => return Ok(()),
    };

    info!(?schema, "Running database migrations...");

    let migrator = match schema {
        Schema::Users => sqlx::migrate!("../../migrations/users"),
        Schema::Orders => sqlx::migrate!("../../migrations/orders"),
    };

    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!(?schema, "Database migrations completed successfully");
    Ok(())
}
