//! Convenience result type alias for mapsync.

use crate::error::AppError;

/// A specialized `Result` type for mapsync operations.
pub type AppResult<T> = Result<T, AppError>;
