//! Error types for the pyrepl backend

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for pyrepl operations
pub type ReplResult<T> = Result<T, ReplError>;

/// Main error type for the pyrepl backend
///
/// Script errors, timeouts and launch failures never appear here; they
/// are absorbed into Execution records. Only infrastructure failures
/// propagate as errors.
#[derive(Error, Debug, Clone)]
pub enum ReplError {
    /// The referenced session does not exist
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Storage layer errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReplError {
    /// Create a new session-not-found error
    pub fn session_not_found(id: impl Into<String>) -> Self {
        Self::SessionNotFound(id.into())
    }
}

impl From<StoreError> for ReplError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::SessionNotFound(id),
            other => Self::Storage(other.to_string()),
        }
    }
}
