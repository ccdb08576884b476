//! Payments domain errors

use thiserror::Error;

/// Errors that can occur in the payments domain
#[derive(Debug, Error)]
pub enum PaymentError {
    /// An in-flight intent already exists for the claim
    #[error("Claim {0} already has an in-flight payment intent")]
    AlreadyFunding(String),

    /// Action not valid for the intent's current status
    #[error("Cannot {action} a payment intent in status {status}")]
    InvalidIntentState { status: String, action: String },

    /// Intent not found
    #[error("Payment intent not found: {0}")]
    NotFound(String),
}
