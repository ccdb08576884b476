//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the funding core.
//! Fixtures are consistent and predictable so unit tests can assert on
//! exact values.

use chrono::NaiveDate;
use core_kernel::{ClaimId, Currency, Money, PaymentIntentId, PracticeId};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

/// A stable practice id shared by fixtures that must collide on fingerprints
pub static FIXTURE_PRACTICE: Lazy<PracticeId> = Lazy::new(PracticeId::new);

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The canonical small-claim amount: 15,000 cents
    pub fn usd_small_claim() -> Money {
        Money::from_minor(15_000, Currency::USD)
    }

    /// An amount in the standard underwriting band
    pub fn usd_standard_claim() -> Money {
        Money::from_minor(250_000, Currency::USD)
    }

    /// An amount above the default review threshold
    pub fn usd_review_claim() -> Money {
        Money::from_minor(750_000, Currency::USD)
    }

    /// A comfortable capital seed
    pub fn usd_seed() -> Money {
        Money::from_minor(10_000_000, Currency::USD)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// Standard procedure date used across claim fixtures
    pub fn procedure_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid fixture date")
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn practice_id() -> PracticeId {
        PracticeId::new()
    }

    pub fn claim_id() -> ClaimId {
        ClaimId::new()
    }

    pub fn payment_intent_id() -> PaymentIntentId {
        PaymentIntentId::new()
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn payer() -> &'static str {
        "Evergreen Mutual"
    }

    pub fn patient_name() -> &'static str {
        "Jordan Reyes"
    }

    pub fn failure_code() -> &'static str {
        "ACCOUNT_CLOSED"
    }
}
