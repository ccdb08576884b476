//! HTTP API Layer
//!
//! This crate provides the REST API for the claim funding core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims, payments, and ledger reporting
//! - **DTOs**: Request/Response data transfer objects (amounts in minor units)
//! - **Error Handling**: Consistent error responses mapped from domain errors
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use funding_service::FundingService;

use crate::config::ApiConfig;
use crate::handlers::{claims, health, ledger, payments};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RwLock<FundingService>>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(service: Arc<RwLock<FundingService>>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::submit_claim))
        .route("/", get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/transitions", get(claims::get_transitions))
        .route("/:id/transition", post(claims::transition_claim));

    let payments_routes = Router::new()
        .route("/", get(payments::list_payments))
        .route("/fund", post(payments::fund_claim))
        .route("/webhook", post(payments::provider_webhook))
        .route("/:id/retry", post(payments::retry_payment))
        .route("/:id/sync", post(payments::sync_payment))
        .route("/:id/cancel", post(payments::cancel_payment))
        .route("/:id/resolve", post(payments::resolve_payment))
        .route("/claim/:claim_id", get(payments::payments_for_claim));

    let ledger_routes = Router::new()
        .route("/summary", get(ledger::capital_summary))
        .route("/seed", post(ledger::seed_capital));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/payments", payments_routes)
        .nest("/ledger", ledger_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
