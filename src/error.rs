//! Error types for mindful.

use thiserror::Error;

/// Errors produced by mindful.
#[derive(Debug, Error)]
pub enum MindfulError {
    /// Configuration could not be read, parsed, or written.
    #[error("config error: {0}")]
    Config(String),

    /// The local journal database failed.
    #[error("database error: {0}")]
    Database(String),

    /// Filesystem or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A requested item does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation was attempted in a phase that does not allow it.
    ///
    /// These are logged and ignored by the session controller; they never
    /// reach the user as a failure.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Input was rejected before any state was touched.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The journal service refused or failed to store a session.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl MindfulError {
    /// Build an invalid-state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error is an ignorable phase-guard rejection.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

/// Failure reported by a journal service when submitting a session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// Storage or network could not be reached.
    #[error("journal unavailable: {0}")]
    Unavailable(String),

    /// The record was refused as invalid.
    #[error("journal rejected the entry: {0}")]
    Rejected(String),

    /// The sign-in is missing or expired.
    #[error("not signed in or sign-in expired")]
    Unauthorized,
}

impl PersistenceError {
    /// Whether the failure means the user must sign in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
