//! Convenience result type alias for Telehub.

use crate::error::AppError;

/// A specialized `Result` type for Telehub operations.
pub type AppResult<T> = Result<T, AppError>;
