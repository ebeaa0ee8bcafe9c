//! Subprocess execution for the pyrepl backend
//!
//! One fresh interpreter process is spawned per code submission; the
//! process shares no state with prior runs. Stdout and stderr are
//! captured as they arrive and a wall-clock timeout bounds every run.

pub mod runner;

pub use runner::{RunOutcome, RunStatus, Runner, DEFAULT_INTERPRETER, DEFAULT_TIMEOUT};
