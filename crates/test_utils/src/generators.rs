//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_claims::ClaimStatus;
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::CAD),
        Just(Currency::EUR),
        Just(Currency::GBP),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating amounts that may be zero or negative
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for generating positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating positive USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating any claim status
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop_oneof![
        Just(ClaimStatus::New),
        Just(ClaimStatus::NeedsReview),
        Just(ClaimStatus::Approved),
        Just(ClaimStatus::Paid),
        Just(ClaimStatus::Collecting),
        Just(ClaimStatus::Closed),
        Just(ClaimStatus::Declined),
        Just(ClaimStatus::PaymentException),
    ]
}

/// Strategy for generating plausible procedure dates
pub fn procedure_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2024i32..2027, 1u32..13, 1u32..29).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).expect("day range keeps dates valid")
    })
}

/// Strategy for generating payer names, including blank ones
pub fn payer_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[A-Z][a-z]{2,10} (Health|Mutual|Insurance)".prop_map(|s| s),
        1 => Just(String::new()),
    ]
}
