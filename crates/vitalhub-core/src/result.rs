//! Result alias used across all VitalHub crates.

use crate::error::AppError;

/// Shorthand for `Result<T, AppError>`, the return type of every
/// fallible operation in the workspace.
pub type AppResult<T> = Result<T, AppError>;
