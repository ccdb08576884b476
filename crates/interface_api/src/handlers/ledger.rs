//! Ledger reporting handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use core_kernel::Money;

use crate::dto::ledger::{CapitalSummaryResponse, SeedRequest, SeedResponse};
use crate::error::ApiError;
use crate::AppState;

/// Derived capital-pool metrics
pub async fn capital_summary(
    State(state): State<AppState>,
) -> Result<Json<CapitalSummaryResponse>, ApiError> {
    let service = state.service.read().await;
    let summary = service.capital_summary()?;
    Ok(Json(CapitalSummaryResponse::from(&summary)))
}

/// Seeds the capital pool, idempotent per reference
pub async fn seed_capital(
    State(state): State<AppState>,
    Json(request): Json<SeedRequest>,
) -> Result<(StatusCode, Json<SeedResponse>), ApiError> {
    request.validate()?;

    let mut service = state.service.write().await;
    let currency = service.currency();
    let entry = service.seed_capital(
        Money::from_minor(request.amount_minor, currency),
        &request.reference,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(SeedResponse {
            entry_id: entry.id.as_uuid(),
            amount_minor: request.amount_minor,
        }),
    ))
}
