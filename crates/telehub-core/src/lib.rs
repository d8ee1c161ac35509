//! # telehub-core
//!
//! Core crate for Telehub. Contains configuration schemas, shared domain
//! types (outcomes, service and resource names), and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Telehub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
