//! Capital Ledger Domain
//!
//! This crate implements the double-entry capital ledger backing claim
//! funding. The ledger is append-only: every capital movement is a balanced
//! group of postings created from exactly one idempotency key, and account
//! balances are always derived from postings, never stored.
//!
//! # Posting conventions
//!
//! ```text
//! seed capital   Credit CapitalCash    / Debit  CapitalContribution
//! reserve        Debit  CapitalCash    / Credit PaymentClearing
//! settle         Debit  PaymentClearing / Credit PracticePayable
//! release        reversal of the reserve entry
//! ```

pub mod account;
pub mod entry;
pub mod error;
pub mod ledger;

pub use account::{LedgerAccount, LedgerAccountType};
pub use entry::{Direction, EntryDraft, LedgerEntry, Posting};
pub use error::LedgerError;
pub use ledger::{CapitalSummary, Ledger};
