//! traefik-exporter binary.
//!
//! Resolves configuration, builds the exporter and serves the telemetry
//! endpoint until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use traefik_exporter::cli::Cli;
use traefik_exporter::config::{validate_config, ConfigError};
use traefik_exporter::exporter::{Exporter, MetricRegistry};
use traefik_exporter::health::HealthClient;
use traefik_exporter::http::HttpServer;
use traefik_exporter::lifecycle::{signals, Shutdown};
use traefik_exporter::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "traefik-exporter starting"
    );
    tracing::info!(
        listen_address = %config.web.listen_address,
        telemetry_path = %config.web.telemetry_path,
        traefik_address = %config.traefik.address,
        timeout_secs = config.traefik.timeout_secs,
        "Configuration loaded"
    );

    let client = HealthClient::new(
        config.traefik.address.parse()?,
        Duration::from_secs(config.traefik.timeout_secs),
    );
    let exporter = Exporter::new(client, MetricRegistry::new()?);

    let listener = TcpListener::bind(config.web.socket_addr()?).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::forward_signals(&signal_shutdown).await;
    });

    let server = HttpServer::new(config.web, exporter)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
