//! Core data records
//!
//! Defines the two persisted record types:
//! - Session: a user's working context, grouping executions
//! - Execution: one code submission and its captured result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logical grouping of executions, typically one per client tab
///
/// Sessions are never deleted; "clearing history" on the client side is
/// done by creating a fresh session and abandoning the old id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    pub id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with a generated ID
    ///
    /// Both timestamps start equal; nothing updates a session after
    /// creation in the current scope.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert shape for an execution, before the store assigns an id and
/// completion timestamp
#[derive(Debug, Clone)]
pub struct NewExecution {
    /// Owning session id
    pub session_id: String,

    /// The exact submitted source text
    pub code: String,

    /// Trimmed stdout, `None` when empty
    pub output: Option<String>,

    /// Trimmed stderr or a synthesized failure message, `None` when empty
    pub error: Option<String>,

    /// True on nonzero exit, stderr output, timeout or launch failure
    pub is_error: bool,
}

/// A single record of one code submission and its captured result
///
/// Immutable once stored. `executed_at` is assigned at completion time,
/// which also defines the listing order within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Unique execution identifier
    pub id: String,

    /// Owning session id
    pub session_id: String,

    /// The exact submitted source text
    pub code: String,

    /// Captured standard output, trimmed; `None` when empty
    pub output: Option<String>,

    /// Captured standard error or synthesized message; `None` when empty
    pub error: Option<String>,

    /// Completion timestamp
    pub executed_at: DateTime<Utc>,

    /// Whether the run is considered failed
    pub is_error: bool,
}
