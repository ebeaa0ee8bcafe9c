//! In-memory execution store
//!
//! Keeps sessions and executions in two maps guarded by an async
//! RwLock. No eviction, no capacity bound, no persistence; everything
//! is gone on process restart.

use super::{ExecutionStore, StoreResult};
use crate::model::{Execution, NewExecution, Session};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-memory store backed by HashMaps
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Session>>,
    executions: RwLock<HashMap<String, Execution>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of executions currently held, across all sessions
    pub async fn execution_count(&self) -> usize {
        self.executions.read().await.len()
    }
}

#[async_trait]
impl ExecutionStore for MemoryStore {
    async fn create_session(&self) -> StoreResult<Session> {
        let session = Session::new();
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        debug!("Created session {}", session.id);
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn create_execution(&self, record: NewExecution) -> StoreResult<Execution> {
        let execution = Execution {
            id: Uuid::new_v4().to_string(),
            session_id: record.session_id,
            code: record.code,
            output: record.output,
            error: record.error,
            executed_at: Utc::now(),
            is_error: record.is_error,
        };

        self.executions
            .write()
            .await
            .insert(execution.id.clone(), execution.clone());

        debug!(
            "Stored execution {} for session {} (is_error: {})",
            execution.id, execution.session_id, execution.is_error
        );
        Ok(execution)
    }

    async fn executions_for_session(&self, session_id: &str) -> StoreResult<Vec<Execution>> {
        let executions = self.executions.read().await;

        let mut matching: Vec<Execution> = executions
            .values()
            .filter(|execution| execution.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by_key(|execution| execution.executed_at);

        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_for(session_id: &str, code: &str) -> NewExecution {
        NewExecution {
            session_id: session_id.to_string(),
            code: code.to_string(),
            output: Some("ok".to_string()),
            error: None,
            is_error: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = MemoryStore::new();

        let session = store.create_session().await.unwrap();
        let found = store.get_session(&session.id).await.unwrap();

        assert!(found.is_some());
        assert_eq!(found.unwrap().id, session.id);
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let store = MemoryStore::new();
        assert!(store.get_session("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_ids_never_collide() {
        let store = MemoryStore::new();

        let a = store.create_session().await.unwrap();
        let b = store.create_session().await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_create_execution_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let session = store.create_session().await.unwrap();

        let before = Utc::now();
        let execution = store
            .create_execution(record_for(&session.id, "print(1)"))
            .await
            .unwrap();

        assert!(!execution.id.is_empty());
        assert!(execution.executed_at >= before);
        assert_eq!(execution.session_id, session.id);
    }

    #[tokio::test]
    async fn test_executions_ordered_by_completion_time() {
        let store = MemoryStore::new();
        let session = store.create_session().await.unwrap();

        for i in 0..5 {
            store
                .create_execution(record_for(&session.id, &format!("print({})", i)))
                .await
                .unwrap();
        }

        let listed = store.executions_for_session(&session.id).await.unwrap();
        assert_eq!(listed.len(), 5);
        for pair in listed.windows(2) {
            assert!(pair[0].executed_at <= pair[1].executed_at);
        }
    }

    #[tokio::test]
    async fn test_executions_filtered_by_session() {
        let store = MemoryStore::new();
        let a = store.create_session().await.unwrap();
        let b = store.create_session().await.unwrap();

        store.create_execution(record_for(&a.id, "1")).await.unwrap();
        store.create_execution(record_for(&b.id, "2")).await.unwrap();
        store.create_execution(record_for(&a.id, "3")).await.unwrap();

        let listed = store.executions_for_session(&a.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|e| e.session_id == a.id));
    }

    #[tokio::test]
    async fn test_unknown_session_lists_empty() {
        let store = MemoryStore::new();
        let listed = store.executions_for_session("missing").await.unwrap();
        assert!(listed.is_empty());
    }
}
