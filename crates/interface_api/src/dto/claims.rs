//! Claims DTOs
//!
//! Amounts cross the wire as integer minor units; `Money` never leaves the
//! domain crates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_claims::{Claim, ClaimStatus, Decision, ReasonCode, StatusTransition, UnderwritingDecision};

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitClaimRequest {
    pub practice_id: Uuid,
    #[validate(length(max = 256))]
    pub patient_name: Option<String>,
    /// May be blank; a blank payer routes to manual review
    #[validate(length(max = 256))]
    pub payer: String,
    pub procedure_date: NaiveDate,
    #[validate(range(min = 1))]
    pub billed_amount_minor: i64,
    #[validate(range(min = 1))]
    pub expected_amount_minor: i64,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: ClaimStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub id: Uuid,
    pub decision: Decision,
    pub reasons: Vec<ReasonCode>,
    pub decided_at: DateTime<Utc>,
    pub decided_by: Option<String>,
}

impl From<&UnderwritingDecision> for DecisionResponse {
    fn from(decision: &UnderwritingDecision) -> Self {
        Self {
            id: decision.id.as_uuid(),
            decision: decision.decision,
            reasons: decision.reasons.clone(),
            decided_at: decision.decided_at,
            decided_by: decision.decided_by.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl From<&StatusTransition> for TransitionResponse {
    fn from(transition: &StatusTransition) -> Self {
        Self {
            from: transition.from,
            to: transition.to,
            reason: transition.reason.clone(),
            occurred_at: transition.occurred_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_token: String,
    pub practice_id: Uuid,
    pub patient_name: Option<String>,
    pub payer: String,
    pub procedure_date: NaiveDate,
    pub currency: String,
    pub billed_amount_minor: i64,
    pub expected_amount_minor: i64,
    pub funded_amount_minor: Option<i64>,
    pub status: ClaimStatus,
    pub payment_exception: bool,
    pub exception_code: Option<String>,
    pub decisions: Vec<DecisionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Claim> for ClaimResponse {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id.as_uuid(),
            claim_token: claim.claim_token.clone(),
            practice_id: claim.practice_id.as_uuid(),
            patient_name: claim.patient_name.clone(),
            payer: claim.payer.clone(),
            procedure_date: claim.procedure_date,
            currency: claim.currency().to_string(),
            billed_amount_minor: claim.billed_amount.to_minor(),
            expected_amount_minor: claim.expected_amount.to_minor(),
            funded_amount_minor: claim.funded_amount.map(|m| m.to_minor()),
            status: claim.status,
            payment_exception: claim.payment_exception,
            exception_code: claim.exception_code.clone(),
            decisions: claim.decisions.iter().map(DecisionResponse::from).collect(),
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}
