//! Error taxonomy for the identity and ownership core

use common::StoreError;
use thiserror::Error;
use tracing::warn;

/// Request-scoped failures of the core. None of these terminate the
/// process; unrecoverable startup-class conditions (no storage, no
/// system randomness) are the caller's problem at initialization.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad username or email format, reported to the caller verbatim
    #[error("{0}")]
    Validation(String),

    /// Password shorter than the 8-character minimum
    #[error("inserted password is too short")]
    WeakPassword,

    /// No matching user, document or code
    #[error("record not found")]
    NotFound,

    /// Uniqueness violation surfaced by storage
    #[error("already taken")]
    Conflict,

    /// Authentication failure. The message deliberately does not say
    /// whether the username or the password was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Signup gate rejection
    #[error("code not recognized")]
    CodeNotRecognized,

    /// Malformed identifier supplied by the caller, rejected before
    /// any storage round-trip
    #[error("identifier not valid: {0}")]
    InvalidId(String),

    /// Hash backend failure
    #[error("credential error: {0}")]
    Credential(String),

    /// Transport or availability failure from the persistence
    /// collaborator. Callers may retry idempotent reads but must not
    /// blindly retry writes like registration.
    #[error(transparent)]
    Storage(StoreError),
}

/// Type alias for Result with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict => Self::Conflict,
            other => Self::Storage(other),
        }
    }
}

/// Named ignore-on-failure policy for best-effort operations: the
/// outcome is logged and dropped instead of reaching the caller.
pub fn ignore_on_failure<T, E: std::fmt::Display>(result: Result<T, E>, operation: &str) {
    if let Err(err) = result {
        warn!(%err, operation, "best-effort operation failed, ignoring");
    }
}
