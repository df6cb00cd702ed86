//! # Booking Suite Server
//!
//! HTTP API server for pricing resolution and booking lifecycle, plus the
//! in-process status refresh job.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Booking Suite Server                              │
//! │                                                                         │
//! │  Client ───► HTTP (axum) ───► routes ───► booking-core / booking-db    │
//! │                                  │                                      │
//! │                                  ├──► mailer (SMTP)                     │
//! │                                  │                                      │
//! │  clock ───► status refresh job ──┘                                      │
//! │                                                                         │
//! │  Storage: SQLite (WAL mode, embedded migrations)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use booking_db::{Database, DbConfig};

use crate::config::ServerConfig;
use crate::services::mailer::Mailer;
use crate::services::status_refresh;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Booking Suite server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        email = config.email_enabled(),
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    // Build the mailer
    let mailer = Mailer::new(&config)?;

    // Spawn the status refresh job
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_handle =
        status_refresh::spawn(db.clone(), config.status_refresh_interval_secs, shutdown_rx);

    // Build router and serve
    let state = AppState::new(db.clone(), mailer, config.clone());
    let app = routes::router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the background job and drain connections
    let _ = shutdown_tx.send(true);
    let _ = refresh_handle.await;
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
