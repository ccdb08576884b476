//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more meaningful
//! error messages than standard assertions.

use core_kernel::Money;
use domain_ledger::{Direction, Ledger, LedgerEntry};
use rust_decimal::Decimal;

/// Asserts that a Money value equals the expected minor units
pub fn assert_money_minor(actual: &Money, expected_minor: i64) {
    assert_eq!(
        actual.to_minor(),
        expected_minor,
        "Expected {} minor units, got {} ({})",
        expected_minor,
        actual.to_minor(),
        actual
    );
}

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {money}"
    );
}

/// Asserts that an entry's debits equal its credits
pub fn assert_entry_balanced(entry: &LedgerEntry) {
    let (debits, credits) = entry.postings.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(d, c), p| match p.direction {
            Direction::Debit => (d + p.amount.amount(), c),
            Direction::Credit => (d, c + p.amount.amount()),
        },
    );
    assert_eq!(
        debits, credits,
        "Entry {} is unbalanced: debits={debits}, credits={credits}",
        entry.id
    );
}

/// Asserts that every entry in the ledger is balanced
pub fn assert_ledger_balanced(ledger: &Ledger) {
    for entry in ledger.entries() {
        assert_entry_balanced(entry);
    }
}
