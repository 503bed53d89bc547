//! Custom error types for storage backends
//!
//! Every backend maps its transport-specific failures onto this
//! uniform type so the domain layer never sees driver errors.

use thiserror::Error;

/// Uniform error type for all storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matched the given filter
    #[error("record not found")]
    NotFound,

    /// A unique index rejected the write
    #[error("unique index violation")]
    Conflict,

    /// Transport or availability failure in the backend
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
