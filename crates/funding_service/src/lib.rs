//! Funding service
//!
//! The application layer for same-day claim funding: submission and
//! underwriting, the payment intent orchestrator, and capital reporting,
//! all against the double-entry ledger.

pub mod error;
pub mod service;

pub use error::FundingError;
pub use service::{FundingService, ProviderEvent};
