//! Convenience result type alias for docrepo.

use crate::error::AppError;

/// A specialized `Result` type for repository and store operations.
pub type AppResult<T> = Result<T, AppError>;
