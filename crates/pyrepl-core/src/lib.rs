//! Core library for the pyrepl backend
//!
//! This crate provides the data model and storage layer shared by the
//! rest of the workspace:
//! - Session and Execution records
//! - The `ExecutionStore` trait and its in-memory implementation
//! - Common error types

pub mod error;
pub mod model;
pub mod store;

// Re-export commonly used types
pub use error::{ReplError, ReplResult};
pub use model::{Execution, NewExecution, Session};
pub use store::{ExecutionStore, MemoryStore, StoreError, StoreResult};
