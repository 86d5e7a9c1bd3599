//! Fund Operations Core - API Server Binary
//!
//! This binary starts the HTTP API server for the fund operations service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration and the bundled dataset
//! cargo run --bin fund-operations-api
//!
//! # Run with environment variables
//! API_PORT=9090 API_DATA_PATH=./fund_operations.json API_LOG_FORMAT=json cargo run --bin fund-operations-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level or filter directive (default: info; `RUST_LOG` wins when set)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_DATA_PATH` - Dataset JSON file (default: the bundled dataset)
//! * `API_COMMAND_MODE` - `persist` or `acknowledge` (default: persist)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_fund::{FundOperationsDataset, FundOperationsService, InMemoryFundStore};
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::create_router;

/// Main entry point for the API server.
///
/// Loads configuration, initializes logging, seeds the store, and starts
/// the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The dataset cannot be read or fails validation
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        command_mode = %config.command_mode,
        "Starting Fund Operations API Server"
    );

    let dataset = load_dataset(config.data_path.as_deref())?;
    tracing::info!(
        funds = dataset.funds.len(),
        commitments = dataset.commitments.len(),
        expenses = dataset.expenses.len(),
        "Fund operations dataset loaded"
    );

    let service = FundOperationsService::new(
        Arc::new(InMemoryFundStore::new(dataset)),
        config.command_mode,
    );
    let app = create_router(service, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Reads the dataset from `path`, or the bundled one when no path is configured
fn load_dataset(path: Option<&str>) -> anyhow::Result<FundOperationsDataset> {
    match path {
        Some(path) => FundOperationsDataset::from_path(path)
            .with_context(|| format!("failed to load dataset from {}", path)),
        None => FundOperationsDataset::bundled().context("bundled dataset is invalid"),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
