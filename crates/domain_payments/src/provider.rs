//! Payment provider port
//!
//! The orchestrator talks to payment rails through this trait. The simulated
//! implementation caches results by idempotency key, so a replayed send is
//! answered with the original outcome rather than a second disbursement.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{ClaimId, Money, PracticeId};

/// A disbursement request handed to a provider
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub idempotency_key: String,
    pub claim_id: ClaimId,
    pub practice_id: PracticeId,
    pub amount: Money,
}

/// Provider-side status of a disbursement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    Sent,
    Confirmed,
    Failed,
}

/// Outcome reported by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResult {
    pub status: ProviderStatus,
    pub reference: String,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
}

impl ProviderResult {
    fn sent(reference: String) -> Self {
        Self {
            status: ProviderStatus::Sent,
            reference,
            failure_code: None,
            failure_message: None,
        }
    }

    fn failed(reference: String, code: &str, message: &str) -> Self {
        Self {
            status: ProviderStatus::Failed,
            reference,
            failure_code: Some(code.to_string()),
            failure_message: Some(message.to_string()),
        }
    }
}

/// Port to a payment rail
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Submits a disbursement. Implementations must be idempotent on the
    /// request's idempotency key.
    async fn send_payment(&self, request: PaymentRequest) -> ProviderResult;

    /// Looks up the current status of a previously sent disbursement
    async fn check_status(&self, reference: &str) -> Option<ProviderResult>;

    /// Provider name recorded on intents
    fn name(&self) -> &str;
}

/// Failure behavior for [`SimulatedProvider`]
#[derive(Debug, Clone, Default)]
enum SimulatedMode {
    /// Every send is accepted
    #[default]
    Accept,
    /// Every send fails with the given code and message
    Fail { code: String, message: String },
}

/// In-memory provider used in tests and local runs
#[derive(Default)]
pub struct SimulatedProvider {
    mode: SimulatedMode,
    sent: Mutex<HashMap<String, ProviderResult>>,
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that rejects every disbursement
    pub fn failing(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            mode: SimulatedMode::Fail {
                code: code.into(),
                message: message.into(),
            },
            sent: Mutex::new(HashMap::new()),
        }
    }

    fn lock_sent(&self) -> std::sync::MutexGuard<'_, HashMap<String, ProviderResult>> {
        // Mutex poisoning only happens if a test panicked mid-send.
        self.sent.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PaymentProvider for SimulatedProvider {
    async fn send_payment(&self, request: PaymentRequest) -> ProviderResult {
        let mut sent = self.lock_sent();
        if let Some(previous) = sent.get(&request.idempotency_key) {
            return previous.clone();
        }

        let reference = format!("sim_{}", Uuid::new_v4().simple());
        let result = match &self.mode {
            SimulatedMode::Accept => ProviderResult::sent(reference),
            SimulatedMode::Fail { code, message } => {
                ProviderResult::failed(reference, code, message)
            }
        };
        sent.insert(request.idempotency_key, result.clone());
        result
    }

    async fn check_status(&self, reference: &str) -> Option<ProviderResult> {
        self.lock_sent()
            .values()
            .find(|r| r.reference == reference)
            .cloned()
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    fn request(key: &str) -> PaymentRequest {
        PaymentRequest {
            idempotency_key: key.to_string(),
            claim_id: ClaimId::new(),
            practice_id: PracticeId::new(),
            amount: Money::from_minor(15_000, Currency::USD),
        }
    }

    #[tokio::test]
    async fn test_replayed_key_returns_cached_result() {
        let provider = SimulatedProvider::new();
        let first = provider.send_payment(request("claim:clm_x:payment:v1")).await;
        let second = provider.send_payment(request("claim:clm_x:payment:v1")).await;

        assert_eq!(first.reference, second.reference);
        assert_eq!(second.status, ProviderStatus::Sent);
    }

    #[tokio::test]
    async fn test_failing_mode_reports_code_and_message() {
        let provider = SimulatedProvider::failing("NSF", "insufficient provider balance");
        let result = provider.send_payment(request("claim:clm_y:payment:v1")).await;

        assert_eq!(result.status, ProviderStatus::Failed);
        assert_eq!(result.failure_code.as_deref(), Some("NSF"));
    }

    #[tokio::test]
    async fn test_status_lookup_by_reference() {
        let provider = SimulatedProvider::new();
        let sent = provider.send_payment(request("claim:clm_z:payment:v1")).await;

        let looked_up = provider.check_status(&sent.reference).await.unwrap();
        assert_eq!(looked_up.reference, sent.reference);
        assert!(provider.check_status("sim_missing").await.is_none());
    }
}
