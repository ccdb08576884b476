//! Claim aggregate
//!
//! A claim moves through a fixed status table. `Paid` is deliberately absent
//! from the publicly reachable targets: only a confirmed disbursement marks a
//! claim paid, via [`Claim::mark_paid`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{generate_claim_token, ClaimId, Currency, Money, PracticeId};

use crate::error::ClaimError;
use crate::underwriting::{Decision, UnderwritingDecision};

/// Claim lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Submitted, not yet underwritten
    New,
    /// Flagged for manual review
    NeedsReview,
    /// Cleared for funding
    Approved,
    /// Capital disbursed to the practice
    Paid,
    /// Awaiting insurer reimbursement
    Collecting,
    /// Fully reconciled
    Closed,
    /// Rejected; no capital will move
    Declined,
    /// Disbursement attempt failed, operator action required
    PaymentException,
}

impl ClaimStatus {
    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Closed | ClaimStatus::Declined)
    }
}

/// Input attributes for a claim submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimAttributes {
    pub practice_id: PracticeId,
    pub patient_name: Option<String>,
    pub payer: String,
    pub procedure_date: NaiveDate,
    pub billed_amount: Money,
    pub expected_amount: Money,
}

/// One recorded status change, kept for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A healthcare claim submitted for same-day financing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-shareable, non-guessable token
    pub claim_token: String,
    /// Submitting practice
    pub practice_id: PracticeId,
    /// Patient name as submitted
    pub patient_name: Option<String>,
    /// Insurer expected to reimburse
    pub payer: String,
    /// Date of the procedure
    pub procedure_date: NaiveDate,
    /// Amount billed to the insurer
    pub billed_amount: Money,
    /// Amount expected back from the insurer
    pub expected_amount: Money,
    /// Amount actually disbursed; written exactly once, on confirmation
    pub funded_amount: Option<Money>,
    /// Current lifecycle status
    pub status: ClaimStatus,
    /// Underwriting decisions, append-only
    pub decisions: Vec<UnderwritingDecision>,
    /// Status history, append-only
    pub transitions: Vec<StatusTransition>,
    /// Set while a disbursement failure is unresolved
    pub payment_exception: bool,
    /// Provider failure code behind the exception flag
    pub exception_code: Option<String>,
    /// Duplicate-detection fingerprint
    pub fingerprint: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a claim in `New` from validated submission attributes
    pub fn submit(attributes: ClaimAttributes) -> Result<Self, ClaimError> {
        if attributes.billed_amount.currency() != attributes.expected_amount.currency() {
            return Err(ClaimError::Validation(
                "billed and expected amounts must share a currency".to_string(),
            ));
        }
        if attributes.payer.len() > 256 {
            return Err(ClaimError::Validation("payer name too long".to_string()));
        }

        let fingerprint = fingerprint(
            attributes.practice_id,
            attributes.patient_name.as_deref(),
            attributes.procedure_date,
            attributes.billed_amount,
            &attributes.payer,
        );
        let now = Utc::now();

        Ok(Self {
            id: ClaimId::new_v7(),
            claim_token: generate_claim_token(),
            practice_id: attributes.practice_id,
            patient_name: attributes.patient_name,
            payer: attributes.payer,
            procedure_date: attributes.procedure_date,
            billed_amount: attributes.billed_amount,
            expected_amount: attributes.expected_amount,
            funded_amount: None,
            status: ClaimStatus::New,
            decisions: Vec::new(),
            transitions: Vec::new(),
            payment_exception: false,
            exception_code: None,
            fingerprint,
            created_at: now,
            updated_at: now,
        })
    }

    /// Currency all of this claim's amounts are denominated in
    pub fn currency(&self) -> Currency {
        self.billed_amount.currency()
    }

    /// Applies an underwriting decision to a claim still in `New`
    pub fn apply_decision(&mut self, decision: UnderwritingDecision) -> Result<(), ClaimError> {
        let target = match decision.decision {
            Decision::Approve => ClaimStatus::Approved,
            Decision::Decline => ClaimStatus::Declined,
            Decision::NeedsReview => ClaimStatus::NeedsReview,
        };
        let reason = Some(format!("underwriting: {:?}", decision.reasons));
        self.decisions.push(decision);
        self.move_to(target, reason)
    }

    /// Public, table-validated transition. Targeting `Paid` is always
    /// rejected here; disbursement confirmation is the only path in.
    pub fn transition(
        &mut self,
        to: ClaimStatus,
        reason: Option<String>,
    ) -> Result<(), ClaimError> {
        if to == ClaimStatus::Paid {
            return Err(ClaimError::InvalidTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", to),
            });
        }
        if self.status == ClaimStatus::NeedsReview && to == ClaimStatus::Approved
            && reason.as_deref().map_or(true, |r| r.trim().is_empty())
        {
            return Err(ClaimError::Validation(
                "manual approval requires a reason".to_string(),
            ));
        }
        self.move_to(to, reason)
    }

    /// Marks the claim paid after a confirmed disbursement. Writes
    /// `funded_amount` exactly once.
    pub fn mark_paid(&mut self, funded_amount: Money) -> Result<(), ClaimError> {
        self.move_to(ClaimStatus::Paid, Some("disbursement confirmed".to_string()))?;
        if self.funded_amount.is_none() {
            self.funded_amount = Some(funded_amount);
        }
        self.payment_exception = false;
        self.exception_code = None;
        Ok(())
    }

    /// Flags a disbursement failure and parks the claim in `PaymentException`
    pub fn flag_payment_exception(&mut self, code: impl Into<String>) -> Result<(), ClaimError> {
        let code = code.into();
        self.move_to(
            ClaimStatus::PaymentException,
            Some(format!("disbursement failed: {code}")),
        )?;
        self.payment_exception = true;
        self.exception_code = Some(code);
        Ok(())
    }

    /// Clears the exception flag and returns the claim to `Approved`,
    /// used when a failed or cancelled disbursement is retried or abandoned
    pub fn clear_payment_exception(&mut self, reason: Option<String>) -> Result<(), ClaimError> {
        if self.status != ClaimStatus::Approved {
            self.move_to(ClaimStatus::Approved, reason)?;
        }
        self.payment_exception = false;
        self.exception_code = None;
        Ok(())
    }

    fn move_to(&mut self, to: ClaimStatus, reason: Option<String>) -> Result<(), ClaimError> {
        if !self.can_transition_to(to) {
            return Err(ClaimError::InvalidTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", to),
            });
        }
        self.transitions.push(StatusTransition {
            from: self.status,
            to,
            reason,
            occurred_at: Utc::now(),
        });
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Full machine table, including the orchestrator-only edges into `Paid`
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (New, NeedsReview)
                | (New, Approved)
                | (New, Declined)
                | (NeedsReview, Approved)
                | (NeedsReview, Declined)
                | (Approved, Paid)
                | (Approved, Declined)
                | (Approved, PaymentException)
                | (PaymentException, Paid)
                | (PaymentException, Approved)
                | (PaymentException, Declined)
                | (PaymentException, Closed)
                | (Paid, Collecting)
                | (Collecting, Closed)
        )
    }
}

/// Deterministic duplicate-detection fingerprint over the attributes that
/// identify one real-world claim: practice, patient, procedure date, billed
/// minor units, and payer.
pub fn fingerprint(
    practice_id: PracticeId,
    patient_name: Option<&str>,
    procedure_date: NaiveDate,
    billed_amount: Money,
    payer: &str,
) -> String {
    [
        practice_id.to_string(),
        patient_name.unwrap_or("").trim().to_lowercase(),
        procedure_date.to_string(),
        billed_amount.to_minor().to_string(),
        payer.trim().to_lowercase(),
    ]
    .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::underwriting::ReasonCode;

    fn attributes() -> ClaimAttributes {
        ClaimAttributes {
            practice_id: PracticeId::new(),
            patient_name: Some("Jordan Reyes".to_string()),
            payer: "Acme Health".to_string(),
            procedure_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            billed_amount: Money::from_minor(15_000, Currency::USD),
            expected_amount: Money::from_minor(12_000, Currency::USD),
        }
    }

    fn approved_claim() -> Claim {
        let mut claim = Claim::submit(attributes()).unwrap();
        claim
            .apply_decision(UnderwritingDecision::record(
                claim.id,
                Decision::Approve,
                vec![ReasonCode::WithinStandardLimits],
                None,
            ))
            .unwrap();
        claim
    }

    mod submission {
        use super::*;

        #[test]
        fn test_submit_starts_in_new_with_token() {
            let claim = Claim::submit(attributes()).unwrap();
            assert_eq!(claim.status, ClaimStatus::New);
            assert!(claim.claim_token.starts_with("clm_"));
            assert!(claim.funded_amount.is_none());
            assert!(!claim.payment_exception);
        }

        #[test]
        fn test_mixed_currency_amounts_rejected() {
            let mut attrs = attributes();
            attrs.expected_amount = Money::from_minor(12_000, Currency::EUR);
            assert!(matches!(
                Claim::submit(attrs),
                Err(ClaimError::Validation(_))
            ));
        }

        #[test]
        fn test_fingerprint_is_deterministic_and_normalized() {
            let practice = PracticeId::new();
            let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
            let amount = Money::from_minor(15_000, Currency::USD);

            let a = fingerprint(practice, Some("Jordan Reyes"), date, amount, "Acme Health");
            let b = fingerprint(practice, Some("  jordan reyes "), date, amount, "ACME HEALTH");
            assert_eq!(a, b);

            let c = fingerprint(practice, None, date, amount, "Acme Health");
            assert_ne!(a, c);
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn test_public_transition_to_paid_always_rejected() {
            let mut claim = approved_claim();
            let result = claim.transition(ClaimStatus::Paid, None);
            assert!(matches!(result, Err(ClaimError::InvalidTransition { .. })));
            assert_eq!(claim.status, ClaimStatus::Approved);
        }

        #[test]
        fn test_new_cannot_jump_to_collecting() {
            let mut claim = Claim::submit(attributes()).unwrap();
            assert!(claim.transition(ClaimStatus::Collecting, None).is_err());
        }

        #[test]
        fn test_manual_approval_requires_a_reason() {
            let mut claim = Claim::submit(attributes()).unwrap();
            claim
                .apply_decision(UnderwritingDecision::record(
                    claim.id,
                    Decision::NeedsReview,
                    vec![ReasonCode::AmountExceedsThreshold],
                    None,
                ))
                .unwrap();

            assert!(claim.transition(ClaimStatus::Approved, None).is_err());
            claim
                .transition(
                    ClaimStatus::Approved,
                    Some("verified with payer".to_string()),
                )
                .unwrap();
            assert_eq!(claim.status, ClaimStatus::Approved);
        }

        #[test]
        fn test_terminal_statuses_admit_nothing() {
            let mut claim = Claim::submit(attributes()).unwrap();
            claim
                .transition(ClaimStatus::Declined, Some("test".to_string()))
                .unwrap();
            assert!(claim.status.is_terminal());
            assert!(claim.transition(ClaimStatus::Approved, None).is_err());
        }

        #[test]
        fn test_history_records_every_move() {
            let mut claim = approved_claim();
            claim.mark_paid(Money::from_minor(12_000, Currency::USD)).unwrap();
            claim.transition(ClaimStatus::Collecting, None).unwrap();

            let path: Vec<ClaimStatus> = claim.transitions.iter().map(|t| t.to).collect();
            assert_eq!(
                path,
                vec![ClaimStatus::Approved, ClaimStatus::Paid, ClaimStatus::Collecting]
            );
        }
    }

    mod paid {
        use super::*;

        #[test]
        fn test_funded_amount_written_once() {
            let mut claim = approved_claim();
            claim.mark_paid(Money::from_minor(12_000, Currency::USD)).unwrap();
            assert_eq!(
                claim.funded_amount,
                Some(Money::from_minor(12_000, Currency::USD))
            );
        }

        #[test]
        fn test_exception_round_trip_clears_flag() {
            let mut claim = approved_claim();
            claim.flag_payment_exception("INSUFFICIENT_PROVIDER_BALANCE").unwrap();
            assert_eq!(claim.status, ClaimStatus::PaymentException);
            assert!(claim.payment_exception);

            claim.clear_payment_exception(Some("retrying".to_string())).unwrap();
            assert_eq!(claim.status, ClaimStatus::Approved);
            assert!(!claim.payment_exception);
            assert!(claim.exception_code.is_none());
        }

        #[test]
        fn test_paid_from_exception_after_recovery() {
            let mut claim = approved_claim();
            claim.flag_payment_exception("TIMEOUT").unwrap();
            claim.mark_paid(Money::from_minor(12_000, Currency::USD)).unwrap();
            assert_eq!(claim.status, ClaimStatus::Paid);
            assert!(!claim.payment_exception);
        }
    }
}
