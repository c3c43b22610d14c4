mod backend;
mod config;
mod protocol;
mod server;
mod stream;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use backend::{Backend, Venice, VeniceConfig};
use config::{normalize_addr, Config};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Configure logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    let api_key = match &config.venice_api_key {
        Some(key) => {
            if std::env::var("VENICE_API_KEY").is_err() {
                warn!("Venice API key provided via command-line flag - use VENICE_API_KEY env var in production");
            }
            key.clone()
        }
        None => {
            error!("VENICE_API_KEY is required");
            std::process::exit(1);
        }
    };

    let backend = Arc::new(Venice::new(VeniceConfig {
        base_url: Some(config.venice_base_url.clone()),
        api_key,
    }));

    info!(
        backend = backend.name(),
        base_url = backend.base_url(),
        "using backend"
    );

    // No request or read timeout: streamed completions run as long as upstream does.
    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "failed to build HTTP client");
            std::process::exit(1);
        });

    let app = server::build_router(backend, http_client);

    let addr = normalize_addr(&config.addr);
    let listener = TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        error!(addr = addr, error = %e, "failed to bind");
        std::process::exit(1);
    });

    info!(addr = addr, "server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "server error");
            std::process::exit(1);
        });

    info!("server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
