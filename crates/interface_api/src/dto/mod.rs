//! Request/response data transfer objects

pub mod claims;
pub mod ledger;
pub mod payments;
