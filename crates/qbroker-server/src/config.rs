//! Command-line configuration

use clap::{Parser, ValueEnum};

/// Default `RUST_LOG`-style filter when the environment sets none
pub const DEFAULT_LOG_FILTER: &str = "qbroker=debug,qbroker_core=debug,qbroker_storage=debug,tower_http=debug";

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "qbroker")]
#[command(about = "In-memory HTTP message broker", version, long_about = None)]
pub struct Args {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the queue service
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Print the OpenAPI document and exit
    #[arg(long)]
    pub openapi: bool,
}

impl Args {
    /// `host:port` string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
