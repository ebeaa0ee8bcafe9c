//! Session service
//!
//! Orchestrates the execution store and the process runner behind the
//! operations the HTTP layer exposes: create a session, execute code
//! within a session, list a session's history.

use std::sync::Arc;

use pyrepl_core::error::{ReplError, ReplResult};
use pyrepl_core::model::{Execution, NewExecution, Session};
use pyrepl_core::store::ExecutionStore;
use pyrepl_runner::{RunOutcome, RunStatus, Runner};
use tracing::{debug, info};

/// Facade over store + runner
pub struct SessionService {
    store: Arc<dyn ExecutionStore>,
    runner: Runner,
}

impl SessionService {
    /// Create a service over the given store and runner
    pub fn new(store: Arc<dyn ExecutionStore>, runner: Runner) -> Self {
        Self { store, runner }
    }

    /// Create a new session
    pub async fn create_session(&self) -> ReplResult<Session> {
        let session = self.store.create_session().await?;
        info!("Created session {}", session.id);
        Ok(session)
    }

    /// List a session's executions, ascending by completion time
    pub async fn list_executions(&self, session_id: &str) -> ReplResult<Vec<Execution>> {
        Ok(self.store.executions_for_session(session_id).await?)
    }

    /// Execute code within an existing session and record the result
    ///
    /// Script errors, timeouts and launch failures are all absorbed
    /// into the stored record; only an unknown session or a storage
    /// fault surfaces as an error. Empty code is executed as-is (an
    /// empty program completes cleanly with no output).
    pub async fn execute(&self, session_id: &str, code: &str) -> ReplResult<Execution> {
        if self.store.get_session(session_id).await?.is_none() {
            return Err(ReplError::session_not_found(session_id));
        }

        debug!(
            "Executing {} bytes of code in session {}",
            code.len(),
            session_id
        );
        let outcome = self.runner.run(code).await;
        let record = self.build_record(session_id, code, outcome);

        Ok(self.store.create_execution(record).await?)
    }

    /// Assemble the persisted record from a runner outcome
    fn build_record(&self, session_id: &str, code: &str, outcome: RunOutcome) -> NewExecution {
        let output = trim_to_option(&outcome.stdout);
        let stderr = trim_to_option(&outcome.stderr);
        // Failure classification looks at the raw stream: whitespace-only
        // stderr still marks the run failed even though the stored error
        // field trims to nothing.
        let stderr_raw_empty = outcome.stderr.is_empty();

        let (error, is_error) = match outcome.status {
            RunStatus::Completed { exit_code } => {
                let is_error = exit_code != 0 || !stderr_raw_empty;
                (stderr, is_error)
            }
            RunStatus::TimedOut => {
                let timeout_msg = format!(
                    "Execution timed out after {} seconds",
                    self.runner.timeout().as_secs()
                );
                let error = match stderr {
                    Some(partial) => format!("{}\n{}", timeout_msg, partial),
                    None => timeout_msg,
                };
                (Some(error), true)
            }
            RunStatus::LaunchFailed { message } => {
                (Some(format!("Execution error: {}", message)), true)
            }
        };

        NewExecution {
            session_id: session_id.to_string(),
            code: code.to_string(),
            output,
            error,
            is_error,
        }
    }
}

/// Trim a raw stream; empty becomes `None`
fn trim_to_option(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
