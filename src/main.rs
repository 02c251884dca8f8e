//! Catalog: a product-catalog REST service with span instrumentation.
//!
//! # Usage
//!
//! ```bash
//! catalog --port 8080 --data-dir ./data --log-level info
//! ```
//!
//! Environment variables can also be used:
//! - `CATALOG_PORT`: Port to listen on
//! - `CATALOG_DATA_DIR`: Data directory for SQLite
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector for trace export
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use catalog::config::Config;
use catalog::observability::tracing::init_tracing;
use catalog::server::run_server;
use std::fs;
use tokio::sync::watch;

/// Print startup banner with version and configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
    ____       _        _
   / ___|__ _ | |_ __ _| | ___   __ _
  | |   / _` || __/ _` | |/ _ \ / _` |
  | |__| (_| || || (_| | | (_) | (_| |
   \____\__,_| \__\__,_|_|\___/ \__, |
                                |___/

  Catalog v{} - Product Catalog Service

  Configuration:
    Address:    {}:{}
    Data Dir:   {}
    Log Level:  {}
    OTLP:       {}

  Press Ctrl+C to shutdown gracefully.
"#,
        version,
        config.host,
        config.port,
        config.data_dir.display(),
        config.log_level,
        config.otel_endpoint.as_deref().unwrap_or("disabled"),
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Initialize tracing/logging (and OTLP export if configured)
    let tracing_guard = init_tracing(
        &config.log_level,
        config.otel_endpoint.as_deref(),
        &config.service_name,
    )?;

    // Ensure data directory exists
    fs::create_dir_all(&config.data_dir)?;

    // Print startup banner
    print_banner(&config);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler task
    tokio::spawn(async move {
        // Wait for SIGTERM or SIGINT (Ctrl+C)
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating shutdown...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating shutdown...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.expect("failed to listen for ctrl+c");
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }

        // Signal shutdown
        let _ = shutdown_tx.send(true);
    });

    // Run the server
    let result = run_server(config, shutdown_rx).await;

    // Flush buffered spans even if the server failed
    tracing_guard.shutdown();

    result?;
    tracing::info!("Catalog shutdown complete");
    Ok(())
}
