//! Payment intents
//!
//! An intent is the durable record of one disbursement attempt family for a
//! claim. Its idempotency key is stable across retries; each retry bumps the
//! attempt counter, which namespaces the ledger keys for that attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money, PaymentIntentId, PracticeId};

use crate::error::PaymentError;

/// Payment intent status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentIntentStatus {
    /// Created, reservation posted, not yet handed to the provider
    Queued,
    /// Accepted by the provider, awaiting confirmation
    Sent,
    /// Provider confirmed the disbursement
    Confirmed,
    /// Provider reported failure; reservation released
    Failed,
    /// Abandoned by an operator before confirmation
    Cancelled,
    /// Operator closed out a failed intent without retrying
    Resolved,
}

impl PaymentIntentStatus {
    /// In-flight intents block a second funding round for the claim
    pub fn is_in_flight(&self) -> bool {
        matches!(self, PaymentIntentStatus::Queued | PaymentIntentStatus::Sent)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentIntentStatus::Confirmed
                | PaymentIntentStatus::Cancelled
                | PaymentIntentStatus::Resolved
        )
    }
}

/// Builds the funding idempotency key for a claim. The round only increments
/// when a new funding round is opened after a cancellation.
pub fn funding_key(claim_token: &str, round: u32) -> String {
    format!("claim:{claim_token}:payment:v{round}")
}

/// A disbursement intent for one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Unique identifier
    pub id: PaymentIntentId,
    /// Claim this intent funds
    pub claim_id: ClaimId,
    /// Practice receiving the disbursement
    pub practice_id: PracticeId,
    /// Amount to disburse
    pub amount: Money,
    /// Current status
    pub status: PaymentIntentStatus,
    /// Stable key for this funding round
    pub idempotency_key: String,
    /// Attempt counter, starts at 1 and increments on retry
    pub attempt: u32,
    /// Provider name
    pub provider: String,
    /// Reference assigned by the provider once sent
    pub provider_reference: Option<String>,
    /// Machine-readable failure code from the provider
    pub failure_code: Option<String>,
    /// Human-readable failure detail
    pub failure_message: Option<String>,
    /// True once the current attempt's reservation has been reversed
    pub reservation_released: bool,
    /// When the provider accepted the payment
    pub sent_at: Option<DateTime<Utc>>,
    /// When the provider confirmed the payment
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// Creates a queued intent for a funding round
    pub fn queue(
        claim_id: ClaimId,
        practice_id: PracticeId,
        amount: Money,
        claim_token: &str,
        round: u32,
        provider: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PaymentIntentId::new_v7(),
            claim_id,
            practice_id,
            amount,
            status: PaymentIntentStatus::Queued,
            idempotency_key: funding_key(claim_token, round),
            attempt: 1,
            provider: provider.into(),
            provider_reference: None,
            failure_code: None,
            failure_message: None,
            reservation_released: false,
            sent_at: None,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ledger key for this attempt's reservation entry
    pub fn reserve_key(&self) -> String {
        self.attempt_key("reserve")
    }

    /// Ledger key for this attempt's settlement entry
    pub fn settle_key(&self) -> String {
        self.attempt_key("settle")
    }

    /// Ledger key for this attempt's reservation release
    pub fn release_key(&self) -> String {
        self.attempt_key("release")
    }

    fn attempt_key(&self, leg: &str) -> String {
        format!("{}:a{}:{}", self.idempotency_key, self.attempt, leg)
    }

    /// Queued → Sent, recording the provider reference
    pub fn mark_sent(&mut self, reference: impl Into<String>) -> Result<(), PaymentError> {
        self.step(PaymentIntentStatus::Queued, PaymentIntentStatus::Sent, "send")?;
        self.provider_reference = Some(reference.into());
        self.sent_at = Some(Utc::now());
        Ok(())
    }

    /// Sent → Confirmed
    pub fn mark_confirmed(&mut self) -> Result<(), PaymentError> {
        self.step(PaymentIntentStatus::Sent, PaymentIntentStatus::Confirmed, "confirm")?;
        self.confirmed_at = Some(Utc::now());
        Ok(())
    }

    /// Queued | Sent → Failed, recording the provider's code and message
    pub fn mark_failed(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), PaymentError> {
        if !self.status.is_in_flight() {
            return Err(self.invalid("fail"));
        }
        self.status = PaymentIntentStatus::Failed;
        self.failure_code = Some(code.into());
        self.failure_message = Some(message.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Failed → Queued for a fresh attempt. The attempt counter moves the
    /// ledger key family forward so the new reservation cannot collide with
    /// the released one.
    pub fn retry(&mut self) -> Result<(), PaymentError> {
        self.step(PaymentIntentStatus::Failed, PaymentIntentStatus::Queued, "retry")?;
        self.attempt += 1;
        self.provider_reference = None;
        self.failure_code = None;
        self.failure_message = None;
        self.reservation_released = false;
        self.sent_at = None;
        Ok(())
    }

    /// Queued | Sent | Failed → Cancelled
    pub fn cancel(&mut self) -> Result<(), PaymentError> {
        if self.status.is_terminal() {
            return Err(self.invalid("cancel"));
        }
        self.status = PaymentIntentStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Failed → Resolved
    pub fn resolve(&mut self) -> Result<(), PaymentError> {
        self.step(PaymentIntentStatus::Failed, PaymentIntentStatus::Resolved, "resolve")
    }

    fn step(
        &mut self,
        from: PaymentIntentStatus,
        to: PaymentIntentStatus,
        action: &str,
    ) -> Result<(), PaymentError> {
        if self.status != from {
            return Err(self.invalid(action));
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn invalid(&self, action: &str) -> PaymentError {
        PaymentError::InvalidIntentState {
            status: format!("{:?}", self.status),
            action: action.to_string(),
        }
    }
}
