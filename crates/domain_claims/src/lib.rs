//! Claims domain
//!
//! The claim aggregate with its fixed lifecycle table, duplicate-detection
//! fingerprint, and the pure underwriting engine that disposes of every
//! submission synchronously.

pub mod claim;
pub mod error;
pub mod underwriting;

pub use claim::{fingerprint, Claim, ClaimAttributes, ClaimStatus, StatusTransition};
pub use error::ClaimError;
pub use underwriting::{
    decide, ClaimSnapshot, Decision, ReasonCode, UnderwritingConfig, UnderwritingDecision,
    UnderwritingOutcome,
};
