//! Configuration parsing for the Catalog server.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::Parser;
use std::path::PathBuf;

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "catalog.db";

/// Catalog: a product-catalog REST service with span instrumentation.
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "CATALOG_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CATALOG_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Data directory for the SQLite database
    #[arg(short, long, env = "CATALOG_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Size of the SQLite connection pool
    #[arg(long, env = "CATALOG_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// OpenTelemetry collector endpoint for trace export (optional)
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otel_endpoint: Option<String>,

    /// Service name reported on exported traces
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "catalog")]
    pub service_name: String,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Create a default configuration for testing.
    #[cfg(test)]
    pub fn test_config(data_dir: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0, // Random port
            data_dir,
            log_level: "debug".into(),
            pool_size: 2,
            otel_endpoint: None,
            service_name: "catalog-test".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            log_level: "info".into(),
            pool_size: 8,
            otel_endpoint: None,
            service_name: "catalog".into(),
        }
    }
}
