//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_claims::ClaimError;
use domain_payments::PaymentError;
use funding_service::FundingError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<FundingError> for ApiError {
    fn from(err: FundingError) -> Self {
        match &err {
            FundingError::Claim(ClaimError::NotFound(_))
            | FundingError::Payment(PaymentError::NotFound(_)) => {
                ApiError::NotFound(err.to_string())
            }
            FundingError::Claim(ClaimError::Validation(_)) => {
                ApiError::Validation(err.to_string())
            }
            FundingError::Claim(ClaimError::DuplicateClaim(_))
            | FundingError::Claim(ClaimError::InvalidTransition { .. })
            | FundingError::Payment(PaymentError::AlreadyFunding(_))
            | FundingError::Payment(PaymentError::InvalidIntentState { .. })
            | FundingError::InsufficientCapital { .. }
            | FundingError::ClaimNotFundable { .. }
            | FundingError::PaymentInFlight { .. } => ApiError::Conflict(err.to_string()),
            // Ledger invariant breaches are bugs, not client errors.
            FundingError::Ledger(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
