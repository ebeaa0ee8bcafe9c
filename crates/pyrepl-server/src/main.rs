//! pyrepl server binary
//!
//! Starts the HTTP surface over an in-memory store and a subprocess
//! runner. Set RUST_LOG=debug for verbose logging.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pyrepl_core::store::MemoryStore;
use pyrepl_runner::Runner;
use pyrepl_server::args::Cli;
use pyrepl_server::routes;
use pyrepl_server::service::SessionService;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let runner = Runner::new()
        .with_interpreter(cli.interpreter)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let service = Arc::new(SessionService::new(Arc::new(MemoryStore::new()), runner));

    let addr = SocketAddr::new(cli.host, cli.port);
    routes::serve(service, addr).await;
}
