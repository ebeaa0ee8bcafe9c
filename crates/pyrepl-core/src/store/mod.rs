//! Execution store abstraction and implementations
//!
//! The store is the authoritative registry of sessions and executions
//! for the lifetime of the server process. The trait exists so a
//! durable backend can be substituted without touching the service
//! layer; only the in-memory implementation ships today.

mod memory;

pub use memory::MemoryStore;

use crate::model::{Execution, NewExecution, Session};
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Registry of sessions and their ordered execution history
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Create a new session with a fresh id and timestamps
    async fn create_session(&self) -> StoreResult<Session>;

    /// Look up a session by id; `None` when unknown
    async fn get_session(&self, id: &str) -> StoreResult<Option<Session>>;

    /// Store an execution, assigning its id and completion timestamp
    async fn create_execution(&self, record: NewExecution) -> StoreResult<Execution>;

    /// List a session's executions, ascending by completion time
    ///
    /// Returns an empty vec when the session has no executions or does
    /// not exist.
    async fn executions_for_session(&self, session_id: &str) -> StoreResult<Vec<Execution>>;
}
