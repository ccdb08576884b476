//! Ledger reporting DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_ledger::CapitalSummary;

#[derive(Debug, Deserialize, Validate)]
pub struct SeedRequest {
    #[validate(range(min = 1))]
    pub amount_minor: i64,
    /// Idempotency reference; replaying the same reference seeds once
    #[validate(length(min = 1, max = 128))]
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub entry_id: Uuid,
    pub amount_minor: i64,
}

#[derive(Debug, Serialize)]
pub struct CapitalSummaryResponse {
    pub currency: String,
    pub available_minor: i64,
    pub allocated_minor: i64,
    pub pending_settlement_minor: i64,
}

impl From<&CapitalSummary> for CapitalSummaryResponse {
    fn from(summary: &CapitalSummary) -> Self {
        Self {
            currency: summary.currency.to_string(),
            available_minor: summary.available.to_minor(),
            allocated_minor: summary.allocated.to_minor(),
            pending_settlement_minor: summary.pending_settlement.to_minor(),
        }
    }
}
