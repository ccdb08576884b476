//! API configuration

use domain_claims::UnderwritingConfig;
use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Pool currency code (ISO 4217)
    pub currency: String,
    /// Amounts above this (minor units) route to manual review
    pub review_threshold_minor: i64,
    /// Amounts below this (minor units) auto-approve
    pub auto_approve_below_minor: i64,
    /// Capital seeded into the pool at startup, in minor units; 0 skips seeding
    pub seed_capital_minor: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let underwriting = UnderwritingConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            currency: "USD".to_string(),
            review_threshold_minor: underwriting.review_threshold_minor,
            auto_approve_below_minor: underwriting.auto_approve_below_minor,
            seed_capital_minor: 0,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Underwriting thresholds as the engine expects them
    pub fn underwriting(&self) -> UnderwritingConfig {
        UnderwritingConfig {
            review_threshold_minor: self.review_threshold_minor,
            auto_approve_below_minor: self.auto_approve_below_minor,
        }
    }
}
