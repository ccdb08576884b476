//! Ledger accounts
//!
//! An account is a named bucket with a semantic type from a fixed
//! enumeration. Accounts hold no balance field; balance is always the derived
//! sum of postings against the account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, LedgerAccountId, PracticeId};

/// Semantic account types in the capital ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerAccountType {
    /// Deployable capital pool
    CapitalCash,
    /// Funds reserved for in-flight disbursements
    PaymentClearing,
    /// Settled amounts owed to practices
    PracticePayable,
    /// Funding source for seeded capital (contra)
    CapitalContribution,
}

impl LedgerAccountType {
    /// Contra accounts are the only accounts allowed to carry a negative
    /// derived balance. `CapitalContribution` is the sole contra account: it
    /// absorbs the debit side of capital seeding.
    pub fn is_contra(&self) -> bool {
        matches!(self, LedgerAccountType::CapitalContribution)
    }

    /// True for account types scoped to one practice
    pub fn is_practice_scoped(&self) -> bool {
        matches!(self, LedgerAccountType::PracticePayable)
    }
}

/// An account in the capital ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Unique identifier
    pub id: LedgerAccountId,
    /// Semantic type
    pub account_type: LedgerAccountType,
    /// Currency of every posting to this account
    pub currency: Currency,
    /// Owning practice, for practice-scoped account types
    pub practice_id: Option<PracticeId>,
    /// When the account was opened
    pub created_at: DateTime<Utc>,
}

impl LedgerAccount {
    /// Creates a pool-level account (no practice scope)
    pub fn pool(account_type: LedgerAccountType, currency: Currency) -> Self {
        Self {
            id: LedgerAccountId::new_v7(),
            account_type,
            currency,
            practice_id: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a practice-scoped account
    pub fn for_practice(
        account_type: LedgerAccountType,
        currency: Currency,
        practice_id: PracticeId,
    ) -> Self {
        Self {
            id: LedgerAccountId::new_v7(),
            account_type,
            currency,
            practice_id: Some(practice_id),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_capital_contribution_is_contra() {
        assert!(LedgerAccountType::CapitalContribution.is_contra());
        assert!(!LedgerAccountType::CapitalCash.is_contra());
        assert!(!LedgerAccountType::PaymentClearing.is_contra());
        assert!(!LedgerAccountType::PracticePayable.is_contra());
    }

    #[test]
    fn test_practice_scoping() {
        assert!(LedgerAccountType::PracticePayable.is_practice_scoped());
        assert!(!LedgerAccountType::CapitalCash.is_practice_scoped());

        let practice = PracticeId::new();
        let account = LedgerAccount::for_practice(
            LedgerAccountType::PracticePayable,
            Currency::USD,
            practice,
        );
        assert_eq!(account.practice_id, Some(practice));
    }
}
