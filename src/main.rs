use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

mod config;
mod db;
mod files;
mod http;
mod logging;
mod registration;
mod status;
#[cfg(test)]
mod test_utils;

use crate::db::PostgresDatabase;
use crate::files::DiskFileStore;
use crate::http::AppState;
use crate::registration::RegistrationService;
use crate::status::Uptime;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: String,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    let _log_guard = logging::init_logging(config.logging.as_ref(), cli.verbose)?;

    info!("Event registration server v{}", env!("CARGO_PKG_VERSION"));

    // Captured once at boot; the uptime endpoint measures against it
    let uptime = Uptime::new();

    let database = PostgresDatabase::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to PostgreSQL database")?;

    let files = DiskFileStore::new(&config.uploads.directory)
        .await
        .context("Failed to prepare uploads directory")?;

    let state = Arc::new(AppState {
        service: RegistrationService::new(database),
        files: Arc::new(files),
        uptime,
    });

    let app = http::router(
        state,
        &config.static_site.directory,
        &config.uploads.directory,
    );

    let address: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
