//! Payments domain
//!
//! Payment intents with their status machine and idempotency key family, and
//! the provider port the orchestrator disburses through.

pub mod error;
pub mod intent;
pub mod provider;

pub use error::PaymentError;
pub use intent::{funding_key, PaymentIntent, PaymentIntentStatus};
pub use provider::{
    PaymentProvider, PaymentRequest, ProviderResult, ProviderStatus, SimulatedProvider,
};
