//! Scenario tests for the claims domain
//!
//! Drives a claim through the full lifecycle the way the funding service
//! does: submit, underwrite, apply, then walk the status table.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, PracticeId};
use domain_claims::{
    decide, Claim, ClaimAttributes, ClaimSnapshot, ClaimStatus, Decision, ReasonCode,
    UnderwritingConfig, UnderwritingDecision,
};

fn submission(practice_id: PracticeId, billed_cents: i64) -> ClaimAttributes {
    ClaimAttributes {
        practice_id,
        patient_name: Some("Casey Morgan".to_string()),
        payer: "Evergreen Mutual".to_string(),
        procedure_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
        billed_amount: Money::from_minor(billed_cents, Currency::USD),
        expected_amount: Money::from_minor(billed_cents * 8 / 10, Currency::USD),
    }
}

fn underwrite(claim: &mut Claim, duplicate: bool) {
    let outcome = decide(
        &ClaimSnapshot {
            payer: &claim.payer,
            billed_minor: claim.billed_amount.to_minor(),
            duplicate_fingerprint: duplicate,
        },
        &UnderwritingConfig::default(),
    );
    claim
        .apply_decision(UnderwritingDecision::from_outcome(claim.id, outcome))
        .unwrap();
}

#[test]
fn test_fifteen_thousand_cent_claim_approves_on_submission() {
    let mut claim = Claim::submit(submission(PracticeId::new(), 15_000)).unwrap();
    underwrite(&mut claim, false);

    assert_eq!(claim.status, ClaimStatus::Approved);
    assert_eq!(claim.decisions.len(), 1);
    assert_eq!(claim.decisions[0].decision, Decision::Approve);
    assert_eq!(claim.decisions[0].reasons, vec![ReasonCode::AutoApproved]);
}

#[test]
fn test_duplicate_fingerprint_declines_on_submission() {
    let mut claim = Claim::submit(submission(PracticeId::new(), 15_000)).unwrap();
    underwrite(&mut claim, true);

    assert_eq!(claim.status, ClaimStatus::Declined);
    assert!(claim.status.is_terminal());
}

#[test]
fn test_same_attributes_produce_the_same_fingerprint() {
    let practice = PracticeId::new();
    let a = Claim::submit(submission(practice, 15_000)).unwrap();
    let b = Claim::submit(submission(practice, 15_000)).unwrap();

    assert_eq!(a.fingerprint, b.fingerprint);
    assert_ne!(a.id, b.id);
    assert_ne!(a.claim_token, b.claim_token);
}

#[test]
fn test_full_happy_path_to_closed() {
    let mut claim = Claim::submit(submission(PracticeId::new(), 42_000)).unwrap();
    underwrite(&mut claim, false);
    assert_eq!(claim.status, ClaimStatus::Approved);

    claim.mark_paid(Money::from_minor(33_600, Currency::USD)).unwrap();
    claim.transition(ClaimStatus::Collecting, None).unwrap();
    claim
        .transition(ClaimStatus::Closed, Some("reimbursement received".to_string()))
        .unwrap();

    assert_eq!(claim.status, ClaimStatus::Closed);
    assert_eq!(claim.funded_amount, Some(Money::from_minor(33_600, Currency::USD)));
    assert_eq!(claim.transitions.len(), 4);
}

#[test]
fn test_review_path_requires_manual_reason_then_funds() {
    let mut claim = Claim::submit(submission(PracticeId::new(), 750_000)).unwrap();
    underwrite(&mut claim, false);
    assert_eq!(claim.status, ClaimStatus::NeedsReview);

    assert!(claim.transition(ClaimStatus::Approved, None).is_err());
    claim
        .transition(
            ClaimStatus::Approved,
            Some("payer confirmed coverage".to_string()),
        )
        .unwrap();
    assert_eq!(claim.status, ClaimStatus::Approved);
}

#[test]
fn test_status_serializes_screaming_snake() {
    let json = serde_json::to_string(&ClaimStatus::NeedsReview).unwrap();
    assert_eq!(json, "\"NEEDS_REVIEW\"");
    let json = serde_json::to_string(&ClaimStatus::PaymentException).unwrap();
    assert_eq!(json, "\"PAYMENT_EXCEPTION\"");
}
