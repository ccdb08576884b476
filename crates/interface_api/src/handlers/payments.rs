//! Payments handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use core_kernel::{ClaimId, PaymentIntentId};
use funding_service::ProviderEvent;

use crate::dto::payments::{
    FundRequest, PaymentIntentResponse, ResolveRequest, WebhookRequest,
};
use crate::error::ApiError;
use crate::AppState;

/// Funds an approved claim. Idempotent while an intent is in flight.
pub async fn fund_claim(
    State(state): State<AppState>,
    Json(request): Json<FundRequest>,
) -> Result<(StatusCode, Json<PaymentIntentResponse>), ApiError> {
    let mut service = state.service.write().await;
    let intent = service
        .fund_claim(ClaimId::from_uuid(request.claim_id))
        .await?;
    Ok((StatusCode::CREATED, Json(PaymentIntentResponse::from(&intent))))
}

/// Receives provider events: SENT, CONFIRMED, FAILED
pub async fn provider_webhook(
    State(state): State<AppState>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let mut service = state.service.write().await;
    let intent = service.handle_provider_event(ProviderEvent {
        reference: request.reference,
        status: request.event,
        failure_code: request.failure_code,
        failure_message: request.failure_message,
    })?;
    Ok(Json(PaymentIntentResponse::from(&intent)))
}

/// Retries a failed intent with a fresh reservation
pub async fn retry_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let mut service = state.service.write().await;
    let intent = service
        .retry_payment(PaymentIntentId::from_uuid(id))
        .await?;
    Ok(Json(PaymentIntentResponse::from(&intent)))
}

/// Re-polls the provider for a sent intent whose webhook was lost
pub async fn sync_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let mut service = state.service.write().await;
    let intent = service
        .sync_payment(PaymentIntentId::from_uuid(id))
        .await?;
    Ok(Json(PaymentIntentResponse::from(&intent)))
}

/// Cancels an intent, releasing any outstanding reservation
pub async fn cancel_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let mut service = state.service.write().await;
    let intent = service.cancel_payment(PaymentIntentId::from_uuid(id))?;
    Ok(Json(PaymentIntentResponse::from(&intent)))
}

/// Closes out a failed intent, moving the claim to a terminal status
pub async fn resolve_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let mut service = state.service.write().await;
    let intent =
        service.resolve_payment(PaymentIntentId::from_uuid(id), request.status, request.reason)?;
    Ok(Json(PaymentIntentResponse::from(&intent)))
}

/// Lists payment intents in creation order
pub async fn list_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentIntentResponse>>, ApiError> {
    let service = state.service.read().await;
    let payments = service
        .payments()
        .iter()
        .map(PaymentIntentResponse::from)
        .collect();
    Ok(Json(payments))
}

/// Lists all intents for one claim, across funding rounds
pub async fn payments_for_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<Uuid>,
) -> Result<Json<Vec<PaymentIntentResponse>>, ApiError> {
    let service = state.service.read().await;
    let payments = service
        .payments_for_claim(ClaimId::from_uuid(claim_id))
        .iter()
        .map(PaymentIntentResponse::from)
        .collect();
    Ok(Json(payments))
}
