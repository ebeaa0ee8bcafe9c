//! Command-line arguments for the pyrepl server

use clap::Parser;
use std::net::IpAddr;

/// Backend server for the in-browser Python REPL
#[derive(Debug, Parser)]
#[command(name = "pyrepl", version, about)]
pub struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Interpreter binary used to run submitted code, resolved via PATH
    #[arg(long, default_value = "python3")]
    pub interpreter: String,

    /// Wall-clock limit for a single execution, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}
