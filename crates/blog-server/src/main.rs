//! Blog Server binary
//!
//! Opens the SQLite store, wires the services and serves the JSON API until
//! Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use blog_server::config::{Cli, StorageLocation};
use blog_server::storage::Database;
use blog_server::{build_router, AppState};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    install_panic_hook();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Blog Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(Cli::parse()).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

/// Report panics through tracing as well as stderr
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic| {
        let message = panic
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        let location = panic
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        eprintln!("blog-server panicked at {}: {}", location, message);
        error!(%location, "blog-server panicked: {}", message);
    }));
}

async fn run_server(cli: Cli) -> Result<()> {
    let config = cli.into_config().context("Invalid configuration")?;

    match config.storage_location {
        StorageLocation::Explicit => info!("Using configured database path"),
        StorageLocation::Mount => info!("Using persistent disk storage"),
        StorageLocation::Local => info!("Using local development storage"),
    }
    info!(
        "Config loaded: bind={}, db={}, account_mode={:?}",
        config.bind_address,
        config.database_path.display(),
        config.account_mode
    );

    let db = Arc::new(
        Database::open(&config.database_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open database at {}",
                    config.database_path.display()
                )
            })?,
    );
    info!("SQLite database ready at: {}", config.database_path.display());

    let state = AppState::new(db.clone(), db.clone(), config.account_mode);

    if let Some(dir) = &config.static_dir {
        info!("Static files directory: {}", dir.display());
    }
    let app = build_router(state, config.static_dir.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .context("Failed to bind to address")?;
    info!("Server is running on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Closing database...");
    db.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
