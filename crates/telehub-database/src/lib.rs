//! # telehub-database
//!
//! Database backends (PostgreSQL and in-memory), the bounded session pool
//! that admits transactional work against them, and the repositories that
//! run inside a pooled session.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod transaction;

pub use connection::DatabaseBackend;
pub use pool::{PoolStatus, PooledSession, SessionPool};
pub use transaction::Transaction;
