//! The tiered access protocol
//!
//! Orchestrates the token lifecycle: issue against a settlement-validated
//! payment, consume once, expire. Settlement recording runs in the
//! background after issuance and never blocks or revokes a grant.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TapError},
    id::TokenId,
    payment::{PaymentProof, SettlementClient},
    store::{TokenStore, UsageStats},
    tier::{Tier, TierCatalog},
    token::{AccessToken, TokenSecret},
};

/// Result of a successful access request
///
/// The raw secret appears here and nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessGrant {
    pub token_id: TokenId,
    pub secret: TokenSecret,
    pub tier: Tier,
    pub expires_at: DateTime<Utc>,
    pub features: Vec<String>,
}

/// Result of a successful token consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessReceipt {
    pub token_id: TokenId,
    pub tier: Tier,
    pub features: Vec<String>,
    /// End of the access window the token was granted for
    pub expires_at: DateTime<Utc>,
    pub service: String,
}

/// Tiered Access Protocol for swarm services monetization
pub struct TieredAccessProtocol {
    catalog: TierCatalog,
    store: TokenStore,
    settlement: Arc<dyn SettlementClient>,
}

impl TieredAccessProtocol {
    pub fn new(catalog: TierCatalog, settlement: Arc<dyn SettlementClient>) -> Self {
        Self {
            catalog,
            store: TokenStore::new(),
            settlement,
        }
    }

    /// Request an access token for `tier`, paying with `proof`
    ///
    /// Payment validation happens before anything is minted; settlement
    /// recording is spawned in the background after the grant exists and is
    /// advisory (failures are logged, the grant stands).
    pub async fn request_access(&self, tier: Tier, proof: PaymentProof) -> Result<AccessGrant> {
        let config = self.catalog.config(tier);

        let valid = self
            .settlement
            .validate_payment(&proof, config.price)
            .await?;
        if !valid {
            tracing::warn!("payment rejected for tier {tier} from {}", proof.sender);
            return Err(TapError::PaymentRejected {
                tier: tier.to_string(),
                required_amount: config.price,
            });
        }

        let (token, secret) = AccessToken::issue(tier, config, &proof);
        let grant = AccessGrant {
            token_id: token.id,
            secret,
            tier,
            expires_at: token.expires_at,
            features: config.features.clone(),
        };
        self.store.insert(token);

        let settlement = Arc::clone(&self.settlement);
        tokio::spawn(async move {
            match settlement.process_settlement(&proof, tier).await {
                Ok(()) => tracing::info!("settlement processed for tier {tier}"),
                Err(e) => tracing::error!("settlement failed for tier {tier}: {e}"),
            }
        });

        tracing::info!("access token issued: {} for tier {tier}", grant.token_id);
        Ok(grant)
    }

    /// Consume the token matching `secret` for `service`
    pub fn consume(&self, secret: &str, service: &str) -> Result<AccessReceipt> {
        let token = self.store.consume(secret, service, Utc::now())?;
        let config = self.catalog.config(token.tier);

        tracing::info!(
            "access token consumed: {} for service {service}",
            token.id
        );

        Ok(AccessReceipt {
            token_id: token.id,
            tier: token.tier,
            features: config.features.clone(),
            expires_at: token.expires_at,
            service: service.to_string(),
        })
    }

    /// Drop expired tokens, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let removed = self.store.sweep_expired(Utc::now());
        for id in &removed {
            tracing::debug!("cleaned up expired token: {id}");
        }
        if !removed.is_empty() {
            tracing::info!("removed {} expired tokens", removed.len());
        }
        removed.len()
    }

    /// Aggregate usage statistics
    pub fn usage_stats(&self) -> UsageStats {
        self.store.usage_stats()
    }

    /// The tier catalog this protocol was built with
    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }
}
