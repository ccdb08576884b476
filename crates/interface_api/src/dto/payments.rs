//! Payments DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::ClaimStatus;
use domain_payments::{PaymentIntent, PaymentIntentStatus, ProviderStatus};

#[derive(Debug, Deserialize)]
pub struct FundRequest {
    pub claim_id: Uuid,
}

/// Provider webhook payload for SENT / CONFIRMED / FAILED events
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub reference: String,
    pub event: ProviderStatus,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// Terminal claim status to settle on: DECLINED or CLOSED
    pub status: ClaimStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub practice_id: Uuid,
    pub currency: String,
    pub amount_minor: i64,
    pub status: PaymentIntentStatus,
    pub idempotency_key: String,
    pub attempt: u32,
    pub provider: String,
    pub provider_reference: Option<String>,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&PaymentIntent> for PaymentIntentResponse {
    fn from(intent: &PaymentIntent) -> Self {
        Self {
            id: intent.id.as_uuid(),
            claim_id: intent.claim_id.as_uuid(),
            practice_id: intent.practice_id.as_uuid(),
            currency: intent.amount.currency().to_string(),
            amount_minor: intent.amount.to_minor(),
            status: intent.status,
            idempotency_key: intent.idempotency_key.clone(),
            attempt: intent.attempt,
            provider: intent.provider.clone(),
            provider_reference: intent.provider_reference.clone(),
            failure_code: intent.failure_code.clone(),
            failure_message: intent.failure_message.clone(),
            sent_at: intent.sent_at,
            confirmed_at: intent.confirmed_at,
            created_at: intent.created_at,
        }
    }
}
