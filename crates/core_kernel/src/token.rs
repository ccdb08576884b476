//! Shareable claim tokens
//!
//! A claim token is the human-shareable identity of a claim. It is handed to
//! practices in correspondence, so it must be non-guessable; a random UUID in
//! compact hex form gives 122 bits of entropy.

use uuid::Uuid;

/// Prefix for all claim tokens
pub const CLAIM_TOKEN_PREFIX: &str = "clm_";

/// Generates a fresh, non-guessable claim token (e.g. `clm_6f1a...`)
pub fn generate_claim_token() -> String {
    format!("{}{}", CLAIM_TOKEN_PREFIX, Uuid::new_v4().simple())
}

/// Returns true if the string has the shape of a claim token
pub fn is_claim_token(value: &str) -> bool {
    value
        .strip_prefix(CLAIM_TOKEN_PREFIX)
        .map(|rest| rest.len() == 32 && rest.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}
