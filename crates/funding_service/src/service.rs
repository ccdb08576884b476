//! Funding orchestration
//!
//! `FundingService` owns the in-memory stores and wires the three domains
//! together: every capital movement is a ledger posting keyed by the intent's
//! key family, and every claim status change goes through the claim's own
//! transition table. Intent uniqueness per claim is enforced at insertion,
//! the in-memory stand-in for a database unique constraint on `claim_id`.

use std::collections::HashMap;

use core_kernel::{ClaimId, Currency, LedgerAccountId, Money, PaymentIntentId};
use domain_claims::{
    decide, Claim, ClaimAttributes, ClaimError, ClaimSnapshot, ClaimStatus, StatusTransition,
    UnderwritingConfig, UnderwritingDecision,
};
use domain_ledger::{
    CapitalSummary, EntryDraft, Ledger, LedgerAccountType, LedgerEntry, LedgerError,
};
use domain_payments::{
    PaymentError, PaymentIntent, PaymentIntentStatus, PaymentProvider, PaymentRequest,
    ProviderStatus,
};

use crate::error::FundingError;

/// A provider webhook event
#[derive(Debug, Clone)]
pub struct ProviderEvent {
    pub reference: String,
    pub status: ProviderStatus,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
}

/// The application service for same-day claim funding
pub struct FundingService {
    currency: Currency,
    underwriting: UnderwritingConfig,
    ledger: Ledger,
    claims: HashMap<ClaimId, Claim>,
    claim_order: Vec<ClaimId>,
    fingerprints: HashMap<String, ClaimId>,
    intents: HashMap<PaymentIntentId, PaymentIntent>,
    intent_order: Vec<PaymentIntentId>,
    /// At most one non-superseded intent per claim
    active_intent: HashMap<ClaimId, PaymentIntentId>,
    /// Last funding round opened per claim
    rounds: HashMap<ClaimId, u32>,
    provider: Box<dyn PaymentProvider>,
}

impl FundingService {
    /// Creates a service with a bootstrapped (empty) capital ledger
    pub fn new(
        currency: Currency,
        underwriting: UnderwritingConfig,
        provider: Box<dyn PaymentProvider>,
    ) -> Self {
        Self {
            currency,
            underwriting,
            ledger: Ledger::bootstrap(currency),
            claims: HashMap::new(),
            claim_order: Vec::new(),
            fingerprints: HashMap::new(),
            intents: HashMap::new(),
            intent_order: Vec::new(),
            active_intent: HashMap::new(),
            rounds: HashMap::new(),
            provider,
        }
    }

    /// Pool currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Read access to the ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ----- capital -----

    /// Seeds the capital pool. Idempotent per `reference`.
    pub fn seed_capital(
        &mut self,
        amount: Money,
        reference: &str,
    ) -> Result<LedgerEntry, FundingError> {
        let cash = self.pool_account(LedgerAccountType::CapitalCash)?;
        let contribution = self.pool_account(LedgerAccountType::CapitalContribution)?;
        let entry = self.ledger.post(
            &format!("seed:{reference}"),
            EntryDraft::new(format!("Seed capital ({reference})"))
                .credit(cash, amount)
                .debit(contribution, amount),
        )?;
        tracing::info!(%amount, reference, "seeded capital");
        Ok(entry)
    }

    /// Derived pool metrics: available / allocated / pending settlement
    pub fn capital_summary(&self) -> Result<CapitalSummary, FundingError> {
        Ok(self.ledger.capital_summary(self.currency)?)
    }

    /// All posted ledger entries, oldest first
    pub fn ledger_entries(&self) -> &[LedgerEntry] {
        self.ledger.entries()
    }

    // ----- claims -----

    /// Submits a claim: validates, rejects duplicates, underwrites
    /// synchronously and applies the decision. Never touches the ledger.
    pub fn submit_claim(&mut self, attributes: ClaimAttributes) -> Result<Claim, FundingError> {
        if attributes.billed_amount.currency() != self.currency {
            return Err(ClaimError::Validation(format!(
                "claims must be denominated in {}",
                self.currency
            ))
            .into());
        }

        let mut claim = Claim::submit(attributes)?;
        if let Some(existing) = self.fingerprints.get(&claim.fingerprint) {
            return Err(ClaimError::DuplicateClaim(existing.to_string()).into());
        }

        let outcome = decide(
            &ClaimSnapshot {
                payer: &claim.payer,
                billed_minor: claim.billed_amount.to_minor(),
                duplicate_fingerprint: false,
            },
            &self.underwriting,
        );
        tracing::info!(
            claim = %claim.id,
            decision = ?outcome.decision,
            reasons = ?outcome.reasons,
            "underwrote claim"
        );
        claim.apply_decision(UnderwritingDecision::from_outcome(claim.id, outcome))?;

        self.fingerprints.insert(claim.fingerprint.clone(), claim.id);
        self.claim_order.push(claim.id);
        self.claims.insert(claim.id, claim.clone());
        Ok(claim)
    }

    /// Returns a claim by id
    pub fn claim(&self, claim_id: ClaimId) -> Result<Claim, FundingError> {
        self.claims
            .get(&claim_id)
            .cloned()
            .ok_or_else(|| ClaimError::NotFound(claim_id.to_string()).into())
    }

    /// All claims in submission order
    pub fn claims(&self) -> Vec<Claim> {
        self.claim_order
            .iter()
            .filter_map(|id| self.claims.get(id))
            .cloned()
            .collect()
    }

    /// A claim's status history
    pub fn claim_transitions(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<StatusTransition>, FundingError> {
        Ok(self.claim(claim_id)?.transitions)
    }

    /// Applies a table-validated public transition. Declining is blocked
    /// while a disbursement is in flight; the payment must be cancelled or
    /// settle first, so no payable can exist for a declined claim.
    pub fn transition_claim(
        &mut self,
        claim_id: ClaimId,
        to: ClaimStatus,
        reason: Option<String>,
    ) -> Result<Claim, FundingError> {
        if to == ClaimStatus::Declined {
            if let Some(&active_id) = self.active_intent.get(&claim_id) {
                if self.intent(active_id)?.status.is_in_flight() {
                    return Err(FundingError::PaymentInFlight {
                        claim: claim_id.to_string(),
                    });
                }
            }
        }
        let claim = self
            .claims
            .get_mut(&claim_id)
            .ok_or_else(|| ClaimError::NotFound(claim_id.to_string()))?;
        claim.transition(to, reason)?;
        tracing::info!(claim = %claim_id, to = ?to, "transitioned claim");
        Ok(claim.clone())
    }

    // ----- funding -----

    /// Funds an approved claim: creates the intent, reserves capital, and
    /// hands the disbursement to the provider.
    ///
    /// Calling again while an intent is in flight returns that intent
    /// unchanged. `InsufficientCapital` leaves the claim `Approved` with no
    /// intent and no ledger entry.
    pub async fn fund_claim(&mut self, claim_id: ClaimId) -> Result<PaymentIntent, FundingError> {
        if let Some(&active_id) = self.active_intent.get(&claim_id) {
            let active = self.intent(active_id)?;
            if active.status.is_in_flight() {
                return Ok(active);
            }
            return Err(PaymentError::AlreadyFunding(claim_id.to_string()).into());
        }

        let (practice_id, amount, claim_token, status) = {
            let claim = self
                .claims
                .get(&claim_id)
                .ok_or_else(|| ClaimError::NotFound(claim_id.to_string()))?;
            (
                claim.practice_id,
                claim.expected_amount,
                claim.claim_token.clone(),
                claim.status,
            )
        };
        if status != ClaimStatus::Approved {
            return Err(FundingError::ClaimNotFundable {
                status: format!("{status:?}"),
            });
        }

        let round = self.rounds.get(&claim_id).copied().unwrap_or(0) + 1;
        let intent = PaymentIntent::queue(
            claim_id,
            practice_id,
            amount,
            &claim_token,
            round,
            self.provider.name(),
        );
        self.reserve(&intent)?;

        self.rounds.insert(claim_id, round);
        self.active_intent.insert(claim_id, intent.id);
        self.intent_order.push(intent.id);
        self.intents.insert(intent.id, intent.clone());
        tracing::info!(
            claim = %claim_id,
            intent = %intent.id,
            %amount,
            round,
            "created payment intent"
        );

        self.dispatch(intent.id).await
    }

    /// Retries a failed intent: fresh reservation under the next attempt key,
    /// claim back to `Approved`, then a new provider send.
    pub async fn retry_payment(
        &mut self,
        intent_id: PaymentIntentId,
    ) -> Result<PaymentIntent, FundingError> {
        let mut updated = self.intent(intent_id)?;
        updated.retry()?;

        let mut claim = self.claim(updated.claim_id)?;
        claim.clear_payment_exception(Some("payment retried".to_string()))?;

        self.reserve(&updated)?;

        self.claims.insert(claim.id, claim);
        tracing::info!(intent = %intent_id, attempt = updated.attempt, "retrying payment");
        self.intents.insert(intent_id, updated);
        self.dispatch(intent_id).await
    }

    /// Cancels an intent, releasing any outstanding reservation. The claim
    /// returns to `Approved`; a later `fund_claim` opens a new round.
    pub fn cancel_payment(
        &mut self,
        intent_id: PaymentIntentId,
    ) -> Result<PaymentIntent, FundingError> {
        let mut updated = self.intent(intent_id)?;
        updated.cancel()?;

        // Validated before the reservation reversal posts, so a rejected
        // claim transition leaves the intent and the ledger untouched.
        let mut claim = self.claim(updated.claim_id)?;
        claim.clear_payment_exception(Some("funding cancelled".to_string()))?;

        self.release_reservation(&mut updated, "funding cancelled")?;

        self.claims.insert(claim.id, claim);
        self.active_intent.remove(&updated.claim_id);
        self.intents.insert(intent_id, updated.clone());
        tracing::info!(intent = %intent_id, "cancelled payment intent");
        Ok(updated)
    }

    /// Closes out a failed intent without retrying, moving the claim to an
    /// operator-chosen terminal status.
    pub fn resolve_payment(
        &mut self,
        intent_id: PaymentIntentId,
        to: ClaimStatus,
        reason: Option<String>,
    ) -> Result<PaymentIntent, FundingError> {
        if !matches!(to, ClaimStatus::Declined | ClaimStatus::Closed) {
            return Err(ClaimError::Validation(format!(
                "a failed payment may only resolve the claim to DECLINED or CLOSED, got {to:?}"
            ))
            .into());
        }

        let mut updated = self.intent(intent_id)?;
        updated.resolve()?;

        let claim = self
            .claims
            .get_mut(&updated.claim_id)
            .ok_or_else(|| ClaimError::NotFound(updated.claim_id.to_string()))?;
        claim.transition(to, reason)?;
        claim.payment_exception = false;
        claim.exception_code = None;

        self.active_intent.remove(&updated.claim_id);
        self.intents.insert(intent_id, updated.clone());
        tracing::info!(intent = %intent_id, to = ?to, "resolved failed payment");
        Ok(updated)
    }

    // ----- provider events -----

    /// Applies a provider webhook event to the matching intent
    pub fn handle_provider_event(
        &mut self,
        event: ProviderEvent,
    ) -> Result<PaymentIntent, FundingError> {
        match event.status {
            // Sends are recorded at dispatch time; the webhook is an ack.
            ProviderStatus::Sent => self.intent(self.intent_by_reference(&event.reference)?),
            ProviderStatus::Confirmed => self.confirm_payment(&event.reference),
            ProviderStatus::Failed => {
                let intent_id = self.intent_by_reference(&event.reference)?;
                self.fail_intent(
                    intent_id,
                    event
                        .failure_code
                        .unwrap_or_else(|| "PROVIDER_FAILURE".to_string()),
                    event.failure_message.unwrap_or_default(),
                )
            }
        }
    }

    /// Confirms a sent disbursement: posts the settlement, marks the claim
    /// paid, and records `funded_amount`. No-op on an already confirmed
    /// intent.
    pub fn confirm_payment(&mut self, reference: &str) -> Result<PaymentIntent, FundingError> {
        let intent_id = self.intent_by_reference(reference)?;
        let mut updated = self.intent(intent_id)?;
        if updated.status == PaymentIntentStatus::Confirmed {
            return Ok(updated);
        }
        updated.mark_confirmed()?;

        // The claim transition is validated before any money moves; nothing
        // is committed unless both it and the settlement posting succeed.
        let mut claim = self.claim(updated.claim_id)?;
        claim.mark_paid(updated.amount)?;

        let clearing = self.pool_account(LedgerAccountType::PaymentClearing)?;
        let payable = self.ledger.get_or_register(
            LedgerAccountType::PracticePayable,
            Some(updated.practice_id),
            self.currency,
        );
        self.ledger.post(
            &updated.settle_key(),
            EntryDraft::new(format!("Settle funding for claim {}", updated.claim_id))
                .for_claim(updated.claim_id)
                .debit(clearing, updated.amount)
                .credit(payable, updated.amount),
        )?;

        self.claims.insert(claim.id, claim);
        self.active_intent.remove(&updated.claim_id);
        self.intents.insert(intent_id, updated.clone());
        tracing::info!(
            intent = %intent_id,
            claim = %updated.claim_id,
            amount = %updated.amount,
            "confirmed payment"
        );
        Ok(updated)
    }

    /// Records a provider failure for a sent or queued disbursement
    pub fn fail_payment(
        &mut self,
        reference: &str,
        code: &str,
        message: &str,
    ) -> Result<PaymentIntent, FundingError> {
        let intent_id = self.intent_by_reference(reference)?;
        self.fail_intent(intent_id, code.to_string(), message.to_string())
    }

    /// Re-polls the provider for a sent disbursement whose webhook was lost
    /// and applies the reported outcome. Intents that are not `Sent`, or that
    /// the provider has no record of, are returned unchanged.
    pub async fn sync_payment(
        &mut self,
        intent_id: PaymentIntentId,
    ) -> Result<PaymentIntent, FundingError> {
        let intent = self.intent(intent_id)?;
        if intent.status != PaymentIntentStatus::Sent {
            return Ok(intent);
        }
        let reference = match intent.provider_reference.clone() {
            Some(reference) => reference,
            None => return Ok(intent),
        };

        let result = self.provider.check_status(&reference).await;
        tracing::info!(
            intent = %intent_id,
            reference = %reference,
            status = ?result.as_ref().map(|r| r.status),
            "re-polled provider"
        );
        match result {
            Some(result) => match result.status {
                ProviderStatus::Confirmed => self.confirm_payment(&reference),
                ProviderStatus::Failed => self.fail_intent(
                    intent_id,
                    result
                        .failure_code
                        .unwrap_or_else(|| "PROVIDER_FAILURE".to_string()),
                    result.failure_message.unwrap_or_default(),
                ),
                ProviderStatus::Sent => Ok(intent),
            },
            None => Ok(intent),
        }
    }

    // ----- payments lookup -----

    /// Returns an intent by id
    pub fn payment(&self, intent_id: PaymentIntentId) -> Result<PaymentIntent, FundingError> {
        self.intent(intent_id)
    }

    /// All intents in creation order
    pub fn payments(&self) -> Vec<PaymentIntent> {
        self.intent_order
            .iter()
            .filter_map(|id| self.intents.get(id))
            .cloned()
            .collect()
    }

    /// All intents for one claim, across funding rounds
    pub fn payments_for_claim(&self, claim_id: ClaimId) -> Vec<PaymentIntent> {
        self.intent_order
            .iter()
            .filter_map(|id| self.intents.get(id))
            .filter(|i| i.claim_id == claim_id)
            .cloned()
            .collect()
    }

    // ----- internals -----

    /// Hands a queued intent to the provider and applies the outcome
    async fn dispatch(
        &mut self,
        intent_id: PaymentIntentId,
    ) -> Result<PaymentIntent, FundingError> {
        let intent = self.intent(intent_id)?;
        if intent.status != PaymentIntentStatus::Queued {
            return Ok(intent);
        }

        let result = self
            .provider
            .send_payment(PaymentRequest {
                idempotency_key: intent.idempotency_key.clone(),
                claim_id: intent.claim_id,
                practice_id: intent.practice_id,
                amount: intent.amount,
            })
            .await;

        match result.status {
            ProviderStatus::Sent => {
                let mut updated = intent;
                updated.mark_sent(result.reference.clone())?;
                self.intents.insert(intent_id, updated.clone());
                tracing::info!(intent = %intent_id, reference = %result.reference, "sent payment");
                Ok(updated)
            }
            ProviderStatus::Confirmed => {
                let mut updated = intent;
                updated.mark_sent(result.reference.clone())?;
                self.intents.insert(intent_id, updated);
                self.confirm_payment(&result.reference)
            }
            ProviderStatus::Failed => self.fail_intent(
                intent_id,
                result
                    .failure_code
                    .unwrap_or_else(|| "PROVIDER_FAILURE".to_string()),
                result.failure_message.unwrap_or_default(),
            ),
        }
    }

    /// Fails an intent, releases its reservation, and flags the claim.
    /// No-op on an already failed intent.
    fn fail_intent(
        &mut self,
        intent_id: PaymentIntentId,
        code: String,
        message: String,
    ) -> Result<PaymentIntent, FundingError> {
        let mut updated = self.intent(intent_id)?;
        if updated.status == PaymentIntentStatus::Failed {
            return Ok(updated);
        }
        updated.mark_failed(code.clone(), message)?;

        let mut claim = self.claim(updated.claim_id)?;
        claim.flag_payment_exception(code.as_str())?;

        self.release_reservation(&mut updated, &code)?;

        self.claims.insert(claim.id, claim);
        self.intents.insert(intent_id, updated.clone());
        tracing::warn!(
            intent = %intent_id,
            claim = %updated.claim_id,
            code,
            "payment failed"
        );
        Ok(updated)
    }

    /// Posts the reservation for an intent's current attempt
    fn reserve(&mut self, intent: &PaymentIntent) -> Result<(), FundingError> {
        let cash = self.pool_account(LedgerAccountType::CapitalCash)?;
        let clearing = self.pool_account(LedgerAccountType::PaymentClearing)?;
        self.ledger.post(
            &intent.reserve_key(),
            EntryDraft::new(format!("Reserve funding for claim {}", intent.claim_id))
                .for_claim(intent.claim_id)
                .debit(cash, intent.amount)
                .credit(clearing, intent.amount),
        )?;
        Ok(())
    }

    /// Reverses the current attempt's reservation if it is still outstanding
    fn release_reservation(
        &mut self,
        intent: &mut PaymentIntent,
        reason: &str,
    ) -> Result<(), FundingError> {
        if intent.reservation_released {
            return Ok(());
        }
        if let Some(entry) = self.ledger.entry_by_key(&intent.reserve_key()) {
            let entry_id = entry.id;
            self.ledger
                .reverse(entry_id, &intent.release_key(), reason)?;
            intent.reservation_released = true;
        }
        Ok(())
    }

    fn intent(&self, intent_id: PaymentIntentId) -> Result<PaymentIntent, FundingError> {
        self.intents
            .get(&intent_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(intent_id.to_string()).into())
    }

    fn intent_by_reference(&self, reference: &str) -> Result<PaymentIntentId, FundingError> {
        self.intent_order
            .iter()
            .filter_map(|id| self.intents.get(id))
            .find(|i| i.provider_reference.as_deref() == Some(reference))
            .map(|i| i.id)
            .ok_or_else(|| PaymentError::NotFound(reference.to_string()).into())
    }

    fn pool_account(
        &self,
        account_type: LedgerAccountType,
    ) -> Result<LedgerAccountId, FundingError> {
        self.ledger
            .account(account_type, None, self.currency)
            .map(|a| a.id)
            .ok_or_else(|| {
                LedgerError::AccountNotFound(format!("{account_type:?}")).into()
            })
    }
}
