//! Unified application error types for Telehub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested record was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// Every session slot of a pool is in use.
    PoolExhausted,
    /// The underlying database handle could not start a unit of work.
    Connection,
    /// A statement, commit, or rollback failed.
    Database,
    /// The named service was never registered with the accumulator.
    UnknownService,
    /// The named resource is not monitored.
    UnknownResource,
    /// Publishing an event to the broker failed after all retries.
    PublishFailure,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether a caller may reasonably retry the failed operation.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::PoolExhausted | Self::Connection | Self::PublishFailure
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::PoolExhausted => write!(f, "POOL_EXHAUSTED"),
            Self::Connection => write!(f, "CONNECTION"),
            Self::Database => write!(f, "DATABASE"),
            Self::UnknownService => write!(f, "UNKNOWN_SERVICE"),
            Self::UnknownResource => write!(f, "UNKNOWN_RESOURCE"),
            Self::PublishFailure => write!(f, "PUBLISH_FAILURE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Telehub.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls or
/// explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a pool-exhausted error.
    pub fn pool_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PoolExhausted, message)
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create an unknown-service error.
    pub fn unknown_service(name: &str) -> Self {
        Self::new(ErrorKind::UnknownService, format!("unknown service: {name}"))
    }

    /// Create an unknown-resource error.
    pub fn unknown_resource(name: &str) -> Self {
        Self::new(ErrorKind::UnknownResource, format!("unknown resource: {name}"))
    }

    /// Create a publish-failure error.
    pub fn publish_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PublishFailure, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the caller may retry the operation that produced this error.
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::RowNotFound => ErrorKind::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => ErrorKind::Connection,
            _ => ErrorKind::Database,
        };
        Self::with_source(kind, format!("Database error: {err}"), err)
    }
}
