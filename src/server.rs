//! HTTP server setup and lifecycle.
//!
//! Configures the axum server with:
//! - Product resource handlers and probes
//! - Startup seeding of sample products
//! - Graceful shutdown support

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::observability::SpanHelper;
use crate::service::ProductService;
use crate::storage::SqliteProductRepository;

/// Open the store and build the product service.
///
/// # Arguments
///
/// * `config` - Server configuration
pub fn build_service(config: &Config) -> Result<ProductService, Box<dyn std::error::Error>> {
    let repository = SqliteProductRepository::open(config.database_path(), config.pool_size)?;
    tracing::info!(path = %config.database_path().display(), "Opened product store");
    Ok(ProductService::new(Arc::new(repository), SpanHelper::global()))
}

/// Run the Catalog HTTP server.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `shutdown_rx` - Receiver for shutdown signal
///
/// # Returns
///
/// Returns when the server has shut down.
pub async fn run_server(
    config: Config,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let service = build_service(&config)?;

    // Seed sample data before accepting requests
    let seeder = service.clone();
    let seeded = tokio::task::spawn_blocking(move || seeder.seed_sample_products()).await??;
    tracing::info!(count = seeded.len(), "Seeded sample products");

    let app = create_router(AppState::new(service));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting Catalog HTTP server");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.changed().await;
            tracing::info!("Shutdown signal received, stopping server");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
