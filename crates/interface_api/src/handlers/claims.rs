//! Claims handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{ClaimId, Money, PracticeId};
use domain_claims::ClaimAttributes;

use crate::dto::claims::{
    ClaimResponse, SubmitClaimRequest, TransitionRequest, TransitionResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Submits a claim; underwriting runs synchronously
pub async fn submit_claim(
    State(state): State<AppState>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    request.validate()?;

    let mut service = state.service.write().await;
    let currency = service.currency();
    let claim = service.submit_claim(ClaimAttributes {
        practice_id: PracticeId::from_uuid(request.practice_id),
        patient_name: request.patient_name,
        payer: request.payer,
        procedure_date: request.procedure_date,
        billed_amount: Money::from_minor(request.billed_amount_minor, currency),
        expected_amount: Money::from_minor(request.expected_amount_minor, currency),
    })?;

    Ok((StatusCode::CREATED, Json(ClaimResponse::from(&claim))))
}

/// Lists claims in submission order
pub async fn list_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let service = state.service.read().await;
    let claims = service.claims().iter().map(ClaimResponse::from).collect();
    Ok(Json(claims))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let service = state.service.read().await;
    let claim = service.claim(ClaimId::from_uuid(id))?;
    Ok(Json(ClaimResponse::from(&claim)))
}

/// Gets a claim's status history
pub async fn get_transitions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransitionResponse>>, ApiError> {
    let service = state.service.read().await;
    let transitions = service.claim_transitions(ClaimId::from_uuid(id))?;
    Ok(Json(transitions.iter().map(TransitionResponse::from).collect()))
}

/// Applies a table-validated status transition
pub async fn transition_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let mut service = state.service.write().await;
    let claim = service.transition_claim(ClaimId::from_uuid(id), request.status, request.reason)?;
    Ok(Json(ClaimResponse::from(&claim)))
}
