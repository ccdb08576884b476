//! Core Kernel - Foundational types and utilities for the claim funding system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic over integer minor units
//! - Strongly typed identifiers and shareable claim tokens
//! - Common error types

pub mod error;
pub mod identifiers;
pub mod money;
pub mod token;

pub use error::CoreError;
pub use identifiers::{
    ClaimId, DecisionId, LedgerAccountId, LedgerEntryId, PaymentIntentId, PostingId, PracticeId,
};
pub use money::{Currency, Money, MoneyError};
pub use token::generate_claim_token;
