//! Chess Daily - A web page with a chess.com player's ratings and today's results
//!
//! Serves a single dashboard page backed by the chess.com public API, with
//! upstream results cached in memory for a few minutes.

use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use chess_daily::cache::StatsCache;
use chess_daily::cli::{Cli, ServerConfig};
use chess_daily::dashboard::Dashboard;
use chess_daily::data::ChessComClient;
use chess_daily::web;

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves when the process is asked to stop (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server");
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = ChessComClient::with_timeout(&config.api_base_url, config.request_timeout)?;
    let cache = StatsCache::new(client, config.cache.clone());
    let dashboard = Arc::new(Dashboard::new(config.username.clone(), cache));

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        username = %config.username,
        addr = %listener.local_addr()?,
        ttl_minutes = config.cache.ttl.num_minutes(),
        "dashboard listening"
    );

    axum::serve(listener, web::router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match ServerConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    init_tracing();

    run(config)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "server failed"))
}
