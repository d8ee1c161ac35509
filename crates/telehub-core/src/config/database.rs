//! Monitored database configuration.

use serde::{Deserialize, Serialize};

use crate::types::names::{ORDER_SERVICE, USER_SERVICE};

/// Which backend serves a database resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseProvider {
    /// PostgreSQL through sqlx.
    #[default]
    Postgres,
    /// Process-local tables, for development and tests.
    Memory,
}

/// The two transactional backends sampled by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabasesConfig {
    /// Database backing the user service.
    pub user: DatabaseConfig,
    /// Database backing the order service.
    pub order: DatabaseConfig,
}

impl DatabasesConfig {
    /// Resource name / configuration pairs, in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DatabaseConfig)> {
        [(USER_SERVICE, &self.user), (ORDER_SERVICE, &self.order)].into_iter()
    }
}

/// Bounded session pool configuration for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend provider.
    #[serde(default)]
    pub provider: DatabaseProvider,
    /// PostgreSQL connection URL (ignored by the memory provider).
    #[serde(default)]
    pub url: String,
    /// Maximum number of concurrent logical sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Read timeout in seconds, enforced by the database handle.
    #[serde(default = "default_io_timeout")]
    pub read_timeout_seconds: u64,
    /// Write timeout in seconds, enforced by the database handle.
    #[serde(default = "default_io_timeout")]
    pub write_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Configuration for an in-memory database with the given capacity.
    pub fn memory(max_sessions: u32) -> Self {
        Self {
            provider: DatabaseProvider::Memory,
            max_sessions,
            ..Self::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::default(),
            url: String::new(),
            max_sessions: default_max_sessions(),
            connect_timeout_seconds: default_connect_timeout(),
            read_timeout_seconds: default_io_timeout(),
            write_timeout_seconds: default_io_timeout(),
        }
    }
}

fn default_max_sessions() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_io_timeout() -> u64 {
    30
}
