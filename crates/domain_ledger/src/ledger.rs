//! Append-only double-entry ledger
//!
//! The ledger is the single shared mutable resource of the funding core:
//! every capital-affecting change is routed through [`Ledger::post`].
//!
//! # Invariants
//!
//! - Every entry balances per currency (debits == credits)
//! - No two entries share an idempotency key; a replayed key returns the
//!   original entry without posting again
//! - Entries are applied atomically; a rejected entry leaves no trace
//! - Non-contra accounts never go negative
//! - Posted entries are never mutated or deleted, only reversed

use std::collections::HashMap;

use rust_decimal::Decimal;

use core_kernel::{Currency, LedgerAccountId, LedgerEntryId, Money, PracticeId};

use crate::account::{LedgerAccount, LedgerAccountType};
use crate::entry::{Direction, EntryDraft, LedgerEntry};
use crate::error::LedgerError;

/// The capital ledger
#[derive(Debug, Default)]
pub struct Ledger {
    /// Registered accounts
    accounts: HashMap<LedgerAccountId, LedgerAccount>,
    /// Posted entries, append-only
    entries: Vec<LedgerEntry>,
    /// Idempotency key -> entry index
    by_key: HashMap<String, usize>,
}

/// Derived capital-pool metrics, computed from account balances
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CapitalSummary {
    /// Currency of the pool
    pub currency: Currency,
    /// Deployable capital (CapitalCash balance)
    pub available: Money,
    /// Reserved for in-flight disbursements (PaymentClearing balance)
    pub allocated: Money,
    /// Settled and owed to practices (sum of PracticePayable balances)
    pub pending_settlement: Money,
}

impl Ledger {
    /// Creates an empty ledger with the pool-level accounts registered
    pub fn bootstrap(currency: Currency) -> Self {
        let mut ledger = Self::default();
        for account_type in [
            LedgerAccountType::CapitalCash,
            LedgerAccountType::PaymentClearing,
            LedgerAccountType::CapitalContribution,
        ] {
            ledger
                .register_account(LedgerAccount::pool(account_type, currency))
                .expect("fresh ledger has no accounts");
        }
        ledger
    }

    /// Registers an account
    ///
    /// # Errors
    ///
    /// Returns an error if an account with the same type, practice scope and
    /// currency is already registered.
    pub fn register_account(&mut self, account: LedgerAccount) -> Result<(), LedgerError> {
        let duplicate = self.accounts.values().any(|a| {
            a.account_type == account.account_type
                && a.practice_id == account.practice_id
                && a.currency == account.currency
        });
        if duplicate {
            return Err(LedgerError::AccountAlreadyExists(format!(
                "{:?}/{:?}/{}",
                account.account_type, account.practice_id, account.currency
            )));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Looks up an account by type, practice scope and currency
    pub fn account(
        &self,
        account_type: LedgerAccountType,
        practice_id: Option<PracticeId>,
        currency: Currency,
    ) -> Option<&LedgerAccount> {
        self.accounts.values().find(|a| {
            a.account_type == account_type
                && a.practice_id == practice_id
                && a.currency == currency
        })
    }

    /// Looks up an account by type, registering it first if absent
    ///
    /// Used for lazily created practice-scoped payable accounts.
    pub fn get_or_register(
        &mut self,
        account_type: LedgerAccountType,
        practice_id: Option<PracticeId>,
        currency: Currency,
    ) -> LedgerAccountId {
        if let Some(account) = self.account(account_type, practice_id, currency) {
            return account.id;
        }
        let account = match practice_id {
            Some(practice) => LedgerAccount::for_practice(account_type, currency, practice),
            None => LedgerAccount::pool(account_type, currency),
        };
        let id = account.id;
        tracing::info!(
            account_type = ?account_type,
            practice_id = ?practice_id,
            %currency,
            "registered ledger account"
        );
        self.accounts.insert(id, account);
        id
    }

    /// Returns an entry by its idempotency key
    pub fn entry_by_key(&self, idempotency_key: &str) -> Option<&LedgerEntry> {
        self.by_key
            .get(idempotency_key)
            .map(|&idx| &self.entries[idx])
    }

    /// Returns an entry by id
    pub fn entry(&self, id: LedgerEntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All posted entries, oldest first
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Posts a balanced entry atomically
    ///
    /// If an entry with `idempotency_key` already exists the original entry
    /// is returned unchanged and nothing is posted. Otherwise the draft is
    /// validated as a whole and either fully applied or fully rejected.
    ///
    /// # Errors
    ///
    /// - `InvalidPosting` if the draft is empty or an amount is not positive
    /// - `AccountNotFound` / `CurrencyMismatch` for bad account references
    /// - `Unbalanced` if debits != credits for any currency
    /// - `InsufficientFunds` if a non-contra account would go negative
    pub fn post(
        &mut self,
        idempotency_key: &str,
        draft: EntryDraft,
    ) -> Result<LedgerEntry, LedgerError> {
        if let Some(existing) = self.entry_by_key(idempotency_key) {
            tracing::debug!(key = idempotency_key, entry = %existing.id, "replayed ledger entry");
            return Ok(existing.clone());
        }

        self.validate(&draft)?;

        let entry = LedgerEntry {
            id: LedgerEntryId::new_v7(),
            idempotency_key: idempotency_key.to_string(),
            description: draft.description,
            claim_id: draft.claim_id,
            reverses: draft.reverses,
            postings: draft.postings,
            posted_at: chrono::Utc::now(),
        };

        tracing::info!(
            key = idempotency_key,
            entry = %entry.id,
            postings = entry.postings.len(),
            "posted ledger entry"
        );

        self.by_key
            .insert(idempotency_key.to_string(), self.entries.len());
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Posts a reversal of a previous entry
    ///
    /// The reversal is a new entry whose postings are the original's with
    /// direction flipped, referencing the original for audit. The original
    /// entry is never mutated.
    pub fn reverse(
        &mut self,
        entry_id: LedgerEntryId,
        idempotency_key: &str,
        reason: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        let original = self
            .entry(entry_id)
            .ok_or_else(|| LedgerError::EntryNotFound(entry_id.to_string()))?;

        let mut draft = EntryDraft::new(format!("Reversal of {}: {}", entry_id, reason));
        draft.claim_id = original.claim_id;
        draft.reverses = Some(entry_id);
        draft.postings = original.postings.iter().map(|p| p.flipped()).collect();

        self.post(idempotency_key, draft)
    }

    /// Returns the derived balance of an account: credits minus debits
    ///
    /// Balances are never stored; this fold over the posting history is the
    /// only source of truth.
    pub fn balance(&self, account_id: LedgerAccountId) -> Result<Money, LedgerError> {
        let account = self
            .accounts
            .get(&account_id)
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))?;

        let mut balance = Money::zero(account.currency);
        for entry in &self.entries {
            for posting in entry.postings.iter().filter(|p| p.account_id == account_id) {
                balance = match posting.direction {
                    Direction::Credit => balance
                        .checked_add(&posting.amount)
                        .map_err(|e| LedgerError::CalculationError(e.to_string()))?,
                    Direction::Debit => balance
                        .checked_sub(&posting.amount)
                        .map_err(|e| LedgerError::CalculationError(e.to_string()))?,
                };
            }
        }
        Ok(balance)
    }

    /// Balance of the unique pool account of a given type
    pub fn balance_of_type(
        &self,
        account_type: LedgerAccountType,
        currency: Currency,
    ) -> Result<Money, LedgerError> {
        let account = self
            .account(account_type, None, currency)
            .ok_or_else(|| LedgerError::AccountNotFound(format!("{:?}", account_type)))?;
        self.balance(account.id)
    }

    /// Derived capital-pool metrics: available / allocated / pending
    pub fn capital_summary(&self, currency: Currency) -> Result<CapitalSummary, LedgerError> {
        let available = self.balance_of_type(LedgerAccountType::CapitalCash, currency)?;
        let allocated = self.balance_of_type(LedgerAccountType::PaymentClearing, currency)?;

        let mut pending_settlement = Money::zero(currency);
        for account in self.accounts.values().filter(|a| {
            a.account_type == LedgerAccountType::PracticePayable && a.currency == currency
        }) {
            pending_settlement = pending_settlement
                .checked_add(&self.balance(account.id)?)
                .map_err(|e| LedgerError::CalculationError(e.to_string()))?;
        }

        Ok(CapitalSummary {
            currency,
            available,
            allocated,
            pending_settlement,
        })
    }

    /// Validates a draft as a unit before anything is applied
    fn validate(&self, draft: &EntryDraft) -> Result<(), LedgerError> {
        if draft.postings.is_empty() {
            return Err(LedgerError::InvalidPosting(
                "entry must contain at least one posting".to_string(),
            ));
        }

        for posting in &draft.postings {
            if !posting.amount.is_positive() {
                return Err(LedgerError::InvalidPosting(format!(
                    "posting amount must be positive, got {}",
                    posting.amount
                )));
            }
            let account = self
                .accounts
                .get(&posting.account_id)
                .ok_or_else(|| LedgerError::AccountNotFound(posting.account_id.to_string()))?;
            if account.currency != posting.amount.currency() {
                return Err(LedgerError::CurrencyMismatch {
                    posting: posting.amount.currency().to_string(),
                    account: account.currency.to_string(),
                });
            }
        }

        // Debits must equal credits per currency.
        let mut totals: HashMap<Currency, (Decimal, Decimal)> = HashMap::new();
        for posting in &draft.postings {
            let slot = totals
                .entry(posting.amount.currency())
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match posting.direction {
                Direction::Debit => slot.0 += posting.amount.amount(),
                Direction::Credit => slot.1 += posting.amount.amount(),
            }
        }
        for (currency, (debits, credits)) in &totals {
            if debits != credits {
                return Err(LedgerError::Unbalanced {
                    currency: currency.to_string(),
                    debits: *debits,
                    credits: *credits,
                });
            }
        }

        // No non-contra account may be driven negative.
        let mut deltas: HashMap<LedgerAccountId, Decimal> = HashMap::new();
        for posting in &draft.postings {
            let delta = deltas.entry(posting.account_id).or_insert(Decimal::ZERO);
            match posting.direction {
                Direction::Credit => *delta += posting.amount.amount(),
                Direction::Debit => *delta -= posting.amount.amount(),
            }
        }
        for (account_id, delta) in &deltas {
            let account = &self.accounts[account_id];
            if account.account_type.is_contra() {
                continue;
            }
            let current = self.balance(*account_id)?.amount();
            if current + delta < Decimal::ZERO {
                return Err(LedgerError::InsufficientFunds {
                    account: format!("{:?}", account.account_type),
                    available: current,
                    required: -*delta,
                });
            }
        }

        Ok(())
    }
}
