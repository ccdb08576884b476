//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Submission rejected before any state change
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transition not in the status table
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Fingerprint matches an existing claim for the practice
    #[error("Duplicate claim: fingerprint matches claim {0}")]
    DuplicateClaim(String),

    /// Claim not found
    #[error("Claim not found: {0}")]
    NotFound(String),
}
