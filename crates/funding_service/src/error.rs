//! Funding service errors
//!
//! Collects the domain errors into one surface for callers. Ledger
//! `InsufficientFunds` is surfaced as `InsufficientCapital` because at this
//! level it means the pool cannot cover a reservation.

use rust_decimal::Decimal;
use thiserror::Error;

use domain_claims::ClaimError;
use domain_ledger::LedgerError;
use domain_payments::PaymentError;

/// Errors returned by the funding service
#[derive(Debug, Error)]
pub enum FundingError {
    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Ledger(LedgerError),

    /// The capital pool cannot cover the requested reservation
    #[error("Insufficient capital: available={available}, required={required}")]
    InsufficientCapital { available: Decimal, required: Decimal },

    /// Funding requires the claim to be in `Approved`
    #[error("Claim in status {status} cannot be funded")]
    ClaimNotFundable { status: String },

    /// The claim has an in-flight disbursement that must settle, fail, or
    /// be cancelled before the claim can be declined
    #[error("Claim {claim} has a payment in flight")]
    PaymentInFlight { claim: String },
}

impl From<LedgerError> for FundingError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                available, required, ..
            } => FundingError::InsufficientCapital {
                available,
                required,
            },
            other => FundingError::Ledger(other),
        }
    }
}
