//! Underwriting engine
//!
//! Pure rule evaluation: no clock, no I/O, no randomness. The same snapshot
//! and config always produce the same outcome. Rules are evaluated in a fixed
//! priority order and the first match wins; informational reasons may be
//! appended after the deciding one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DecisionId};

/// Final disposition of an underwriting run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Decline,
    NeedsReview,
}

/// Machine-readable reason codes, ordered by rule priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    MissingPayer,
    InvalidAmount,
    DuplicateClaim,
    AmountExceedsThreshold,
    AutoApproved,
    WithinStandardLimits,
}

/// Threshold configuration, in integer minor units
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnderwritingConfig {
    /// Amounts strictly above this route to manual review
    pub review_threshold_minor: i64,
    /// Amounts strictly below this auto-approve
    pub auto_approve_below_minor: i64,
}

impl Default for UnderwritingConfig {
    fn default() -> Self {
        Self {
            review_threshold_minor: 500_000,
            auto_approve_below_minor: 100_000,
        }
    }
}

/// The slice of claim state the engine is allowed to see
#[derive(Debug, Clone)]
pub struct ClaimSnapshot<'a> {
    pub payer: &'a str,
    pub billed_minor: i64,
    pub duplicate_fingerprint: bool,
}

/// Result of one engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderwritingOutcome {
    pub decision: Decision,
    pub reasons: Vec<ReasonCode>,
}

/// Evaluates the rule set against a claim snapshot
pub fn decide(snapshot: &ClaimSnapshot<'_>, config: &UnderwritingConfig) -> UnderwritingOutcome {
    if snapshot.payer.trim().is_empty() {
        return UnderwritingOutcome {
            decision: Decision::NeedsReview,
            reasons: vec![ReasonCode::MissingPayer],
        };
    }
    if snapshot.billed_minor <= 0 {
        return UnderwritingOutcome {
            decision: Decision::NeedsReview,
            reasons: vec![ReasonCode::InvalidAmount],
        };
    }
    if snapshot.duplicate_fingerprint {
        return UnderwritingOutcome {
            decision: Decision::Decline,
            reasons: vec![ReasonCode::DuplicateClaim],
        };
    }
    if snapshot.billed_minor > config.review_threshold_minor {
        return UnderwritingOutcome {
            decision: Decision::NeedsReview,
            reasons: vec![ReasonCode::AmountExceedsThreshold],
        };
    }
    if snapshot.billed_minor < config.auto_approve_below_minor {
        return UnderwritingOutcome {
            decision: Decision::Approve,
            reasons: vec![ReasonCode::AutoApproved],
        };
    }
    UnderwritingOutcome {
        decision: Decision::Approve,
        reasons: vec![ReasonCode::WithinStandardLimits],
    }
}

/// Immutable record of one decision against one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwritingDecision {
    /// Unique identifier
    pub id: DecisionId,
    /// Claim the decision applies to
    pub claim_id: ClaimId,
    /// Disposition
    pub decision: Decision,
    /// Reason codes in rule-priority order
    pub reasons: Vec<ReasonCode>,
    /// When the decision was recorded
    pub decided_at: DateTime<Utc>,
    /// Operator note for manual overrides; `None` for engine decisions
    pub decided_by: Option<String>,
}

impl UnderwritingDecision {
    /// Records a decision
    pub fn record(
        claim_id: ClaimId,
        decision: Decision,
        reasons: Vec<ReasonCode>,
        decided_by: Option<String>,
    ) -> Self {
        Self {
            id: DecisionId::new_v7(),
            claim_id,
            decision,
            reasons,
            decided_at: Utc::now(),
            decided_by,
        }
    }

    /// Records an engine outcome against a claim
    pub fn from_outcome(claim_id: ClaimId, outcome: UnderwritingOutcome) -> Self {
        Self::record(claim_id, outcome.decision, outcome.reasons, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(payer: &str, billed_minor: i64, duplicate: bool) -> ClaimSnapshot<'_> {
        ClaimSnapshot {
            payer,
            billed_minor,
            duplicate_fingerprint: duplicate,
        }
    }

    #[test]
    fn test_blank_payer_routes_to_review() {
        let outcome = decide(&snapshot("   ", 15_000, false), &UnderwritingConfig::default());
        assert_eq!(outcome.decision, Decision::NeedsReview);
        assert_eq!(outcome.reasons, vec![ReasonCode::MissingPayer]);
    }

    #[test]
    fn test_non_positive_amount_routes_to_review() {
        let config = UnderwritingConfig::default();
        for amount in [0, -1, -50_000] {
            let outcome = decide(&snapshot("Acme Health", amount, false), &config);
            assert_eq!(outcome.decision, Decision::NeedsReview);
            assert_eq!(outcome.reasons, vec![ReasonCode::InvalidAmount]);
        }
    }

    #[test]
    fn test_duplicate_declines_even_above_threshold() {
        // Duplicate outranks the threshold rule.
        let config = UnderwritingConfig::default();
        let outcome = decide(&snapshot("Acme Health", 999_999, true), &config);
        assert_eq!(outcome.decision, Decision::Decline);
        assert_eq!(outcome.reasons, vec![ReasonCode::DuplicateClaim]);
    }

    #[test]
    fn test_amount_over_threshold_needs_review() {
        let config = UnderwritingConfig::default();
        let outcome = decide(&snapshot("Acme Health", 500_001, false), &config);
        assert_eq!(outcome.decision, Decision::NeedsReview);
        assert_eq!(outcome.reasons, vec![ReasonCode::AmountExceedsThreshold]);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let config = UnderwritingConfig::default();
        let outcome = decide(&snapshot("Acme Health", 500_000, false), &config);
        assert_eq!(outcome.decision, Decision::Approve);
    }

    #[test]
    fn test_small_amount_auto_approves() {
        let config = UnderwritingConfig::default();
        let outcome = decide(&snapshot("Acme Health", 15_000, false), &config);
        assert_eq!(outcome.decision, Decision::Approve);
        assert_eq!(outcome.reasons, vec![ReasonCode::AutoApproved]);
    }

    #[test]
    fn test_standard_band_approves() {
        let config = UnderwritingConfig::default();
        let outcome = decide(&snapshot("Acme Health", 250_000, false), &config);
        assert_eq!(outcome.decision, Decision::Approve);
        assert_eq!(outcome.reasons, vec![ReasonCode::WithinStandardLimits]);
    }

    proptest! {
        #[test]
        fn decide_is_deterministic(
            billed in -1_000_000i64..1_000_000,
            duplicate in any::<bool>(),
        ) {
            let config = UnderwritingConfig::default();
            let a = decide(&snapshot("Acme Health", billed, duplicate), &config);
            let b = decide(&snapshot("Acme Health", billed, duplicate), &config);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn every_outcome_carries_a_reason(
            billed in -1_000_000i64..1_000_000,
            duplicate in any::<bool>(),
            payer in "[ a-zA-Z]{0,12}",
        ) {
            let config = UnderwritingConfig::default();
            let outcome = decide(&snapshot(&payer, billed, duplicate), &config);
            prop_assert!(!outcome.reasons.is_empty());
        }
    }
}
