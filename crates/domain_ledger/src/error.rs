//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the ledger domain
///
/// `Unbalanced`, `AccountNotFound` and `CurrencyMismatch` indicate
/// programming errors in the caller and are never corrected silently.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account already registered
    #[error("Account already registered: {0}")]
    AccountAlreadyExists(String),

    /// Entry not found
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(String),

    /// Entry is not balanced per currency
    #[error("Unbalanced entry in {currency}: debits={debits}, credits={credits}")]
    Unbalanced {
        currency: String,
        debits: Decimal,
        credits: Decimal,
    },

    /// Posting amount must be strictly positive
    #[error("Invalid posting: {0}")]
    InvalidPosting(String),

    /// Posting currency does not match the account currency
    #[error("Currency mismatch: posting in {posting} against {account} account")]
    CurrencyMismatch { posting: String, account: String },

    /// Posting would drive a non-contra account negative
    #[error("Insufficient funds in {account}: available={available}, required={required}")]
    InsufficientFunds {
        account: String,
        available: Decimal,
        required: Decimal,
    },

    /// Calculation error
    #[error("Calculation error: {0}")]
    CalculationError(String),
}
