//! HTTP server and session service for the pyrepl backend
//!
//! Wires the execution store and the subprocess runner behind the
//! three-endpoint REST surface consumed by the browser editor.

pub mod args;
pub mod routes;
pub mod service;

pub use args::Cli;
pub use service::SessionService;
