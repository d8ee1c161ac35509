//! Database handle management.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use telehub_core::config::{DatabaseConfig, DatabaseProvider};
use telehub_core::error::{AppError, ErrorKind};

use crate::memory::MemoryDatabase;
use crate::transaction::Transaction;

/// The shared database handle owned by a session pool.
#[derive(Debug, Clone)]
pub enum DatabaseBackend {
    /// PostgreSQL through a sqlx connection pool.
    Postgres(PgPool),
    /// Process-local tables.
    Memory(MemoryDatabase),
}

impl DatabaseBackend {
    /// Open a database handle from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        match config.provider {
            DatabaseProvider::Memory => {
                info!("Using in-memory database");
                Ok(Self::Memory(MemoryDatabase::new()))
            }
            DatabaseProvider::Postgres => connect_postgres(config).await.map(Self::Postgres),
        }
    }

    /// Begin a new unit of work on the handle.
    pub async fn begin(&self) -> Result<Transaction, AppError> {
        match self {
            Self::Postgres(pool) => pool.begin().await.map(Transaction::Postgres).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Connection,
                    format!("Failed to begin transaction: {e}"),
                    e,
                )
            }),
            Self::Memory(db) => db.begin().map(Transaction::Memory),
        }
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        match self {
            Self::Postgres(pool) => sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(pool)
                .await
                .map(|v| v == 1)
                .map_err(AppError::from),
            Self::Memory(db) => Ok(db.is_available()),
        }
    }

    /// Close the handle. Subsequent `begin` calls fail.
    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Memory(db) => db.close(),
        }
        info!("Database handle closed");
    }
}

async fn connect_postgres(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    info!(
        url = %mask_password(&config.url),
        max_sessions = config.max_sessions,
        "Connecting to PostgreSQL"
    );

    let statement_timeout = config
        .read_timeout_seconds
        .max(config.write_timeout_seconds);

    let options: PgConnectOptions = config
        .url
        .parse::<PgConnectOptions>()
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid database URL: {e}"),
                e,
            )
        })?
        .options([("statement_timeout", format!("{statement_timeout}s"))]);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_sessions)
        .min_connections(config.max_sessions / 2)
        .max_lifetime(Duration::from_secs(3600))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Connection,
                format!("Failed to connect to database: {e}"),
                e,
            )
        })?;

    info!("Successfully connected to PostgreSQL");
    Ok(pool)
}

/// Mask the password portion of a database URL for safe logging.
pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
