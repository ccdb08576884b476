//! Ledger entries and postings
//!
//! A `LedgerEntry` is an atomic group of postings created from exactly one
//! idempotency key. Within an entry, debits must equal credits per currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, LedgerAccountId, LedgerEntryId, Money, PostingId};

/// Direction of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    /// Returns the opposite direction, used when reversing an entry
    pub fn flipped(&self) -> Self {
        match self {
            Direction::Debit => Direction::Credit,
            Direction::Credit => Direction::Debit,
        }
    }
}

/// A single posting (line item) within an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    /// Unique posting identifier
    pub id: PostingId,
    /// Account to post to
    pub account_id: LedgerAccountId,
    /// Debit or credit
    pub direction: Direction,
    /// Amount (always positive)
    pub amount: Money,
}

impl Posting {
    /// Creates a new debit posting
    pub fn debit(account_id: LedgerAccountId, amount: Money) -> Self {
        Self {
            id: PostingId::new(),
            account_id,
            direction: Direction::Debit,
            amount,
        }
    }

    /// Creates a new credit posting
    pub fn credit(account_id: LedgerAccountId, amount: Money) -> Self {
        Self {
            id: PostingId::new(),
            account_id,
            direction: Direction::Credit,
            amount,
        }
    }

    /// Returns this posting with its direction flipped
    pub fn flipped(&self) -> Self {
        Self {
            id: PostingId::new(),
            account_id: self.account_id,
            direction: self.direction.flipped(),
            amount: self.amount,
        }
    }
}

/// A draft entry awaiting posting
///
/// Drafts are built with the fluent `debit`/`credit` methods and handed to
/// [`crate::Ledger::post`] together with their idempotency key.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    /// Entry description
    pub description: String,
    /// Claim the movement relates to, if any
    pub claim_id: Option<ClaimId>,
    /// Entry this draft reverses, if any
    pub reverses: Option<LedgerEntryId>,
    /// List of postings
    pub postings: Vec<Posting>,
}

impl EntryDraft {
    /// Creates a new empty draft
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            claim_id: None,
            reverses: None,
            postings: Vec::new(),
        }
    }

    /// Tags the draft with the claim it relates to
    pub fn for_claim(mut self, claim_id: ClaimId) -> Self {
        self.claim_id = Some(claim_id);
        self
    }

    /// Adds a debit posting
    pub fn debit(mut self, account_id: LedgerAccountId, amount: Money) -> Self {
        self.postings.push(Posting::debit(account_id, amount));
        self
    }

    /// Adds a credit posting
    pub fn credit(mut self, account_id: LedgerAccountId, amount: Money) -> Self {
        self.postings.push(Posting::credit(account_id, amount));
        self
    }
}

/// A posted, immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier
    pub id: LedgerEntryId,
    /// The idempotency key the entry was created from
    pub idempotency_key: String,
    /// Description
    pub description: String,
    /// Claim the movement relates to, if any
    pub claim_id: Option<ClaimId>,
    /// The entry this one reverses, for audit
    pub reverses: Option<LedgerEntryId>,
    /// Individual postings
    pub postings: Vec<Posting>,
    /// When the entry was posted
    pub posted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    #[test]
    fn test_direction_flip() {
        assert_eq!(Direction::Debit.flipped(), Direction::Credit);
        assert_eq!(Direction::Credit.flipped(), Direction::Debit);
    }

    #[test]
    fn test_draft_builder_collects_postings() {
        let cash = LedgerAccountId::new();
        let clearing = LedgerAccountId::new();
        let amount = Money::from_minor(5000, Currency::USD);

        let draft = EntryDraft::new("reserve funds")
            .debit(cash, amount)
            .credit(clearing, amount);

        assert_eq!(draft.postings.len(), 2);
        assert_eq!(draft.postings[0].direction, Direction::Debit);
        assert_eq!(draft.postings[1].direction, Direction::Credit);
    }

    #[test]
    fn test_flipped_posting_keeps_account_and_amount() {
        let account = LedgerAccountId::new();
        let posting = Posting::debit(account, Money::from_minor(100, Currency::USD));
        let flipped = posting.flipped();

        assert_eq!(flipped.account_id, account);
        assert_eq!(flipped.amount, posting.amount);
        assert_eq!(flipped.direction, Direction::Credit);
        assert_ne!(flipped.id, posting.id);
    }
}
