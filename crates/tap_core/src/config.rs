//! Configuration for the TAP core
//!
//! Loaded from TOML, then overridden by environment variables so deployment
//! secrets (the wallet key in particular) never need to live in a file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TapError},
    tier::{TierCatalog, TierOverrides},
};

/// Settlement endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Base URL of the x402 settlement service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Wallet key sent as a bearer token on settlement calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_key: Option<String>,

    /// Token contract payments are expected against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_contract: Option<String>,

    /// Per-request timeout for settlement calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            wallet_key: None,
            token_contract: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Top-level configuration for the protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Settlement service configuration
    #[serde(default)]
    pub settlement: SettlementConfig,

    /// Tier overrides; omitted tiers keep their defaults
    #[serde(default, skip_serializing_if = "TierOverrides::is_empty")]
    pub tiers: TierOverrides,

    /// How often the expiry sweeper runs, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            settlement: SettlementConfig::default(),
            tiers: TierOverrides::default(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://x402.smolting.systems".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_sweep_interval_secs() -> u64 {
    900
}

impl TapConfig {
    /// Load configuration from a TOML file, then apply env overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TapError::configuration(path.display().to_string(), e))?;

        let mut config: TapConfig = toml::from_str(&raw)
            .map_err(|e| TapError::configuration(path.display().to_string(), e))?;

        config.apply_env();
        Ok(config)
    }

    /// Defaults plus env overrides, for running without a config file
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Environment variables beat file values
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("X402_API_ENDPOINT") {
            self.settlement.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("X402_WALLET_KEY") {
            self.settlement.wallet_key = Some(key);
        }
        if let Ok(contract) = std::env::var("X402_TOKEN_CONTRACT") {
            self.settlement.token_contract = Some(contract);
        }
    }

    /// Build the tier catalog with any configured overrides applied
    pub fn catalog(&self) -> TierCatalog {
        let mut catalog = TierCatalog::default();
        catalog.apply_overrides(&self.tiers);
        catalog
    }

    /// Sweep interval as a std duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = TapConfig::default();
        assert_eq!(config.settlement.request_timeout_secs, 30);
        assert_eq!(config.sweep_interval_secs, 900);
        assert!(config.settlement.wallet_key.is_none());
        assert!(config.tiers.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TapConfig = toml::from_str(
            r#"
            [settlement]
            endpoint = "https://settle.example.dev"
            wallet_key = "wk-123"
            "#,
        )
        .unwrap();

        assert_eq!(config.settlement.endpoint, "https://settle.example.dev");
        assert_eq!(config.settlement.wallet_key.as_deref(), Some("wk-123"));
        assert_eq!(config.settlement.request_timeout_secs, 30);
        assert_eq!(config.sweep_interval_secs, 900);
    }

    #[test]
    fn test_tier_overrides_flow_into_catalog() {
        let config: TapConfig = toml::from_str(
            r#"
            [tiers.basic]
            price = 0.02
            lifespan_hours = 2
            priority = "low"
            features = ["standard_processing"]
            "#,
        )
        .unwrap();

        let catalog = config.catalog();
        assert_eq!(catalog.config(Tier::Basic).price, 0.02);
        assert_eq!(catalog.config(Tier::Basic).lifespan_hours, 2);
        // other tiers untouched
        assert_eq!(catalog.config(Tier::Premium).price, 0.10);
    }
}
