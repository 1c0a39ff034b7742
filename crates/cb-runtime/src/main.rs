//! # Callboard Gateway Runtime
//!
//! The server executable for the call-center dashboard backend.
//!
//! ## Startup Sequence
//!
//! 1. Load `.env` (when present) into the process environment
//! 2. Initialize logging
//! 3. Load and validate the gateway configuration
//! 4. Open the MySQL pool
//! 5. Serve HTTP (or HTTPS when TLS paths are set) until Ctrl+C / SIGTERM

use std::sync::Arc;

use anyhow::{Context, Result};
use cb_gateway::{CallboardGateway, GatewayConfig, GatewayServices, LoggingTelephony, MySqlStore};
use cb_telemetry::{init_logging, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    init_logging(&TelemetryConfig::for_component("gateway"))
        .context("Failed to initialize logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let config = GatewayConfig::from_env().context("Invalid gateway configuration")?;

    info!("===========================================");
    info!("  Callboard Gateway v{}", cb_gateway::VERSION);
    info!("===========================================");
    info!(
        db_host = %config.database.host,
        db_port = config.database.port,
        database = %config.database.database,
        "Connecting to MySQL"
    );

    let store = Arc::new(
        MySqlStore::connect(&config.database)
            .await
            .context("Failed to open MySQL pool")?,
    );
    let services = GatewayServices::new(store.clone(), store, Arc::new(LoggingTelephony));

    let gateway =
        CallboardGateway::new(config, services).context("Failed to build API gateway")?;
    gateway
        .start(shutdown_signal())
        .await
        .context("API gateway terminated")?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Initiating graceful shutdown...");
}
