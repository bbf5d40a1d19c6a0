//! API response types

use serde::{Deserialize, Serialize};
use tap_core::{
    id::TokenId,
    store::{TierUsage, UsageStats},
    tier::{Priority, Tier, TierConfig},
};

/// Access grant response
///
/// The `token` field is the raw secret; this response is the only place it
/// ever appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrantResponse {
    /// Opaque secret to present when consuming
    pub token: String,
    /// Identifier for the issued token
    pub token_id: TokenId,
    /// Tier the token grants access to
    pub tier: Tier,
    /// When the token stops being valid
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Features unlocked by the grant
    pub features: Vec<String>,
}

/// Token consumption receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub token_id: TokenId,
    pub tier: Tier,
    pub features: Vec<String>,
    /// End of the access window the token was granted for
    pub remaining_access: chrono::DateTime<chrono::Utc>,
    pub service: String,
}

/// One tier catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierInfoResponse {
    pub tier: Tier,
    pub price: f64,
    pub lifespan_hours: u32,
    pub priority: Priority,
    pub features: Vec<String>,
}

impl TierInfoResponse {
    pub fn from_config(tier: Tier, config: &TierConfig) -> Self {
        Self {
            tier,
            price: config.price,
            lifespan_hours: config.lifespan_hours,
            priority: config.priority,
            features: config.features.clone(),
        }
    }
}

/// Tier catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCatalogResponse {
    pub tiers: Vec<TierInfoResponse>,
}

/// Usage statistics response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_tokens: usize,
    pub active_tokens: usize,
    pub consumed_tokens: usize,
    pub by_tier: std::collections::HashMap<Tier, TierUsage>,
}

impl From<UsageStats> for StatsResponse {
    fn from(stats: UsageStats) -> Self {
        Self {
            total_tokens: stats.total_tokens,
            active_tokens: stats.active_tokens,
            consumed_tokens: stats.consumed_tokens,
            by_tier: stats.by_tier,
        }
    }
}

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
}
