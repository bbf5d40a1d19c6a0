//! Server configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use tap_core::TapConfig;

use crate::error::{ServerError, ServerResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "127.0.0.1:8080")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bearer key guarding the usage-stats endpoint
    ///
    /// When unset the endpoint is open, which is only sensible for local
    /// runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,

    /// Protocol configuration (settlement endpoint, tiers, sweeping)
    #[serde(default)]
    pub tap: TapConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            admin_key: None,
            tap: TapConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, then apply env overrides
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;

        let mut config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;

        config.apply_env();
        Ok(config)
    }

    /// Defaults plus env overrides, for running without a config file
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("TAP_ADMIN_KEY") {
            self.admin_key = Some(key);
        }
        self.tap.apply_env();
    }
}
