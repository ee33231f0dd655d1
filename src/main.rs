//! Portfolio API service entry point.

use tokio::net::TcpListener;

use portfolio_api::config;
use portfolio_api::lifecycle::{self, Shutdown};
use portfolio_api::observability::logging;
use portfolio_api::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config first: the subscriber level comes from it.
    let config = config::resolve()?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.environment(),
        "portfolio-api starting"
    );

    tracing::info!(
        bind_address = %config.server.bind_address,
        data_dir = %config.storage.data_dir,
        log_dir = %config.storage.log_dir,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    // Bind before subsystem init so a taken port fails fast.
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::init(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::listen_for_signals(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
