//! Integration tests for the capital ledger
//!
//! Exercises the posting invariants end to end: balanced entries only,
//! idempotent keys, atomic rejection, derived balances, and reversals.

use core_kernel::{Currency, Money, PracticeId};
use domain_ledger::{
    EntryDraft, Ledger, LedgerAccount, LedgerAccountType, LedgerError,
};
use rust_decimal::Decimal;

fn usd(cents: i64) -> Money {
    Money::from_minor(cents, Currency::USD)
}

fn ledger_with_capital(cents: i64) -> Ledger {
    let mut ledger = Ledger::bootstrap(Currency::USD);
    let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
    let contribution = account_id(&ledger, LedgerAccountType::CapitalContribution);
    ledger
        .post(
            "seed:v1",
            EntryDraft::new("seed capital")
                .credit(cash, usd(cents))
                .debit(contribution, usd(cents)),
        )
        .unwrap();
    ledger
}

fn account_id(ledger: &Ledger, account_type: LedgerAccountType) -> core_kernel::LedgerAccountId {
    ledger
        .account(account_type, None, Currency::USD)
        .expect("pool account registered")
        .id
}

mod posting {
    use super::*;

    #[test]
    fn test_every_posted_entry_is_balanced() {
        let mut ledger = ledger_with_capital(1_000_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);

        for (i, cents) in [12_000, 7_500, 99_999].iter().enumerate() {
            ledger
                .post(
                    &format!("reserve:{i}"),
                    EntryDraft::new("reserve")
                        .debit(cash, usd(*cents))
                        .credit(clearing, usd(*cents)),
                )
                .unwrap();
        }

        for entry in ledger.entries() {
            let (debits, credits) = entry.postings.iter().fold(
                (Decimal::ZERO, Decimal::ZERO),
                |(d, c), p| match p.direction {
                    domain_ledger::Direction::Debit => (d + p.amount.amount(), c),
                    domain_ledger::Direction::Credit => (d, c + p.amount.amount()),
                },
            );
            assert_eq!(debits, credits, "entry {} is unbalanced", entry.id);
        }
    }

    #[test]
    fn test_replayed_key_does_not_move_balances_again() {
        let mut ledger = ledger_with_capital(100_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);

        let draft = || {
            EntryDraft::new("reserve")
                .debit(cash, usd(10_000))
                .credit(clearing, usd(10_000))
        };
        let first = ledger.post("reserve:replay", draft()).unwrap();
        let before = ledger.balance(cash).unwrap();
        let second = ledger.post("reserve:replay", draft()).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(ledger.balance(cash).unwrap(), before);
    }

    #[test]
    fn test_zero_amount_posting_rejected() {
        let mut ledger = ledger_with_capital(100_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);

        let result = ledger.post(
            "reserve:zero",
            EntryDraft::new("reserve")
                .debit(cash, usd(0))
                .credit(clearing, usd(0)),
        );
        assert!(matches!(result, Err(LedgerError::InvalidPosting(_))));
    }

    #[test]
    fn test_unknown_account_rejected_atomically() {
        let mut ledger = ledger_with_capital(100_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let stranger = core_kernel::LedgerAccountId::new();

        let result = ledger.post(
            "reserve:unknown",
            EntryDraft::new("reserve")
                .debit(cash, usd(500))
                .credit(stranger, usd(500)),
        );
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
        assert_eq!(ledger.balance(cash).unwrap().to_minor(), 100_000);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut ledger = ledger_with_capital(100_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);
        let eur = Money::from_minor(500, Currency::EUR);

        let result = ledger.post(
            "reserve:eur",
            EntryDraft::new("reserve").debit(cash, eur).credit(clearing, eur),
        );
        assert!(matches!(result, Err(LedgerError::CurrencyMismatch { .. })));
    }
}

mod accounts {
    use super::*;

    #[test]
    fn test_duplicate_pool_account_rejected() {
        let mut ledger = Ledger::bootstrap(Currency::USD);
        let result = ledger.register_account(LedgerAccount::pool(
            LedgerAccountType::CapitalCash,
            Currency::USD,
        ));
        assert!(matches!(result, Err(LedgerError::AccountAlreadyExists(_))));
    }

    #[test]
    fn test_practice_payables_are_scoped_per_practice() {
        let mut ledger = Ledger::bootstrap(Currency::USD);
        let practice_a = PracticeId::new();
        let practice_b = PracticeId::new();

        let a = ledger.get_or_register(
            LedgerAccountType::PracticePayable,
            Some(practice_a),
            Currency::USD,
        );
        let b = ledger.get_or_register(
            LedgerAccountType::PracticePayable,
            Some(practice_b),
            Currency::USD,
        );
        let a_again = ledger.get_or_register(
            LedgerAccountType::PracticePayable,
            Some(practice_a),
            Currency::USD,
        );

        assert_ne!(a, b);
        assert_eq!(a, a_again);
    }
}

mod reversal {
    use super::*;

    #[test]
    fn test_reserve_then_release_is_a_balance_no_op() {
        let mut ledger = ledger_with_capital(250_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);
        let before = ledger.balance(cash).unwrap();

        let reserve = ledger
            .post(
                "reserve:noop",
                EntryDraft::new("reserve")
                    .debit(cash, usd(60_000))
                    .credit(clearing, usd(60_000)),
            )
            .unwrap();
        ledger
            .reverse(reserve.id, "release:noop", "provider failure")
            .unwrap();

        assert_eq!(ledger.balance(cash).unwrap(), before);
        assert_eq!(ledger.balance(clearing).unwrap().to_minor(), 0);
    }

    #[test]
    fn test_reversal_is_idempotent_by_key() {
        let mut ledger = ledger_with_capital(250_000);
        let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
        let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);

        let reserve = ledger
            .post(
                "reserve:ri",
                EntryDraft::new("reserve")
                    .debit(cash, usd(10_000))
                    .credit(clearing, usd(10_000)),
            )
            .unwrap();
        let first = ledger.reverse(reserve.id, "release:ri", "failed").unwrap();
        let second = ledger.reverse(reserve.id, "release:ri", "failed").unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(ledger.balance(cash).unwrap().to_minor(), 250_000);
    }

    #[test]
    fn test_reversing_unknown_entry_fails() {
        let mut ledger = ledger_with_capital(1_000);
        let result = ledger.reverse(
            core_kernel::LedgerEntryId::new(),
            "release:missing",
            "no such entry",
        );
        assert!(matches!(result, Err(LedgerError::EntryNotFound(_))));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Any sequence of successful reserve/release pairs leaves the pool
        // exactly where it started.
        #[test]
        fn reserve_release_pairs_preserve_capital(
            amounts in proptest::collection::vec(1i64..50_000, 1..20)
        ) {
            let mut ledger = ledger_with_capital(10_000_000);
            let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
            let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);

            for (i, cents) in amounts.iter().enumerate() {
                let entry = ledger
                    .post(
                        &format!("reserve:p{i}"),
                        EntryDraft::new("reserve")
                            .debit(cash, usd(*cents))
                            .credit(clearing, usd(*cents)),
                    )
                    .unwrap();
                ledger
                    .reverse(entry.id, &format!("release:p{i}"), "prop")
                    .unwrap();
            }

            prop_assert_eq!(ledger.balance(cash).unwrap().to_minor(), 10_000_000);
            prop_assert_eq!(ledger.balance(clearing).unwrap().to_minor(), 0);
        }

        // The capital summary always accounts for every cent that entered
        // the pool: available + allocated + pending == seeded capital.
        #[test]
        fn summary_conserves_seeded_capital(
            reserves in proptest::collection::vec(1i64..10_000, 0..10)
        ) {
            let seed = 1_000_000i64;
            let mut ledger = ledger_with_capital(seed);
            let cash = account_id(&ledger, LedgerAccountType::CapitalCash);
            let clearing = account_id(&ledger, LedgerAccountType::PaymentClearing);

            for (i, cents) in reserves.iter().enumerate() {
                ledger
                    .post(
                        &format!("reserve:c{i}"),
                        EntryDraft::new("reserve")
                            .debit(cash, usd(*cents))
                            .credit(clearing, usd(*cents)),
                    )
                    .unwrap();
            }

            let summary = ledger.capital_summary(Currency::USD).unwrap();
            let total = summary.available.to_minor()
                + summary.allocated.to_minor()
                + summary.pending_settlement.to_minor();
            prop_assert_eq!(total, seed);
        }
    }
}
