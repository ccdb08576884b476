//! Claim Funding Core - API Server Binary
//!
//! This binary starts the HTTP API server for the claim funding core.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin funding-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 API_SEED_CAPITAL_MINOR=100000000 cargo run --bin funding-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_CURRENCY` - Pool currency code (default: USD)
//! * `API_REVIEW_THRESHOLD_MINOR` - Manual-review threshold in minor units
//! * `API_AUTO_APPROVE_BELOW_MINOR` - Auto-approve threshold in minor units
//! * `API_SEED_CAPITAL_MINOR` - Capital seeded at startup in minor units (0 = none)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{Currency, Money};
use domain_payments::SimulatedProvider;
use funding_service::FundingService;
use interface_api::{config::ApiConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Claim Funding Core API Server"
    );

    let service = build_service(&config)?;
    let app = create_router(Arc::new(RwLock::new(service)), config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("invalid server address")?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables, falling back to
/// defaults when unset.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| ApiConfig {
        host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        port: std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080),
        log_level: std::env::var("API_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string()),
        ..ApiConfig::default()
    })
}

/// Builds the funding service from configuration: currency, underwriting
/// thresholds, the simulated provider, and optional startup capital.
fn build_service(config: &ApiConfig) -> anyhow::Result<FundingService> {
    let currency: Currency = config
        .currency
        .parse()
        .context("invalid API_CURRENCY value")?;

    let mut service = FundingService::new(
        currency,
        config.underwriting(),
        Box::new(SimulatedProvider::new()),
    );

    if config.seed_capital_minor > 0 {
        service
            .seed_capital(
                Money::from_minor(config.seed_capital_minor, currency),
                "startup",
            )
            .context("failed to seed startup capital")?;
        tracing::info!(amount_minor = config.seed_capital_minor, "seeded startup capital");
    }

    Ok(service)
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
