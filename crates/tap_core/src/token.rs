//! Access token records
//!
//! Tokens are opaque random secrets handed to the payer at issuance. The
//! store never keeps the raw secret: lookups go through a SHA-256 digest,
//! so the secret exists only in the issuance response.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    id::TokenId,
    payment::PaymentProof,
    tier::{Tier, TierConfig},
};

/// Opaque secret granting access to a tier's features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// Mint a fresh secret (32 random bytes, base64url encoded)
    pub fn mint() -> Self {
        let mut random_bytes = [0u8; 32];
        rand::rng().fill(&mut random_bytes[..]);
        Self(URL_SAFE_NO_PAD.encode(random_bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digest used for storage and lookup (SHA-256, base64url encoded)
    pub fn digest(&self) -> String {
        digest_secret(&self.0)
    }
}

impl std::fmt::Display for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digest an arbitrary presented secret for index lookup
pub fn digest_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// An issued access token
///
/// Flat record: one issuance, at most one consumption, a fixed expiry
/// computed at mint time from the tier's lifespan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Unique identifier for this token
    pub id: TokenId,

    /// SHA-256 digest of the secret handed to the payer
    pub secret_digest: String,

    /// Tier this token grants access to
    pub tier: Tier,

    /// Settlement-side sender identifier of the payer
    pub payer: String,

    /// Amount the payer reported with their proof
    pub payment_amount: f64,

    /// When this token was issued
    pub created_at: DateTime<Utc>,

    /// When this token stops being valid
    pub expires_at: DateTime<Utc>,

    /// When this token was consumed, if it has been
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_at: Option<DateTime<Utc>>,

    /// Service the token was consumed for, if it has been
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_used: Option<String>,
}

impl AccessToken {
    /// Issue a new token for `tier`, returning the record and the raw secret
    pub fn issue(tier: Tier, config: &TierConfig, proof: &PaymentProof) -> (Self, TokenSecret) {
        let secret = TokenSecret::mint();
        let now = Utc::now();

        let token = Self {
            id: TokenId::generate(),
            secret_digest: secret.digest(),
            tier,
            payer: proof.sender.clone(),
            payment_amount: proof.amount,
            created_at: now,
            expires_at: now + config.lifespan(),
            consumed_at: None,
            service_used: None,
        };

        (token, secret)
    }

    /// Check whether the token has been consumed
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Check whether the token is past its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Record consumption for `service`
    ///
    /// Irreversible; callers must have checked `is_consumed` under the same
    /// lock that guards this record.
    pub fn mark_consumed(&mut self, service: &str, now: DateTime<Utc>) {
        self.consumed_at = Some(now);
        self.service_used = Some(service.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierCatalog;
    use pretty_assertions::assert_eq;

    fn proof() -> PaymentProof {
        PaymentProof {
            signature: "3xYzSig".to_string(),
            sender: "payer-7".to_string(),
            amount: 0.01,
            token_contract: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_issue_stamps_expiry_from_lifespan() {
        let catalog = TierCatalog::default();
        let (token, _) = AccessToken::issue(Tier::Basic, catalog.config(Tier::Basic), &proof());

        assert_eq!(token.expires_at - token.created_at, chrono::Duration::hours(1));
        assert_eq!(token.tier, Tier::Basic);
        assert_eq!(token.payer, "payer-7");
        assert!(!token.is_consumed());
    }

    #[test]
    fn test_secret_digest_matches_stored_digest() {
        let catalog = TierCatalog::default();
        let (token, secret) = AccessToken::issue(Tier::Premium, catalog.config(Tier::Premium), &proof());

        assert_eq!(token.secret_digest, digest_secret(secret.as_str()));
        // raw secret never appears in the record
        assert_ne!(token.secret_digest, secret.as_str());
    }

    #[test]
    fn test_minted_secrets_are_unique() {
        assert_ne!(TokenSecret::mint(), TokenSecret::mint());
    }

    #[test]
    fn test_expiry_comparison_is_strict() {
        let catalog = TierCatalog::default();
        let (token, _) = AccessToken::issue(Tier::Basic, catalog.config(Tier::Basic), &proof());

        assert!(!token.is_expired(token.expires_at));
        assert!(token.is_expired(token.expires_at + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_mark_consumed_records_service() {
        let catalog = TierCatalog::default();
        let (mut token, _) = AccessToken::issue(Tier::Basic, catalog.config(Tier::Basic), &proof());

        let now = Utc::now();
        token.mark_consumed("swarm_inference", now);

        assert!(token.is_consumed());
        assert_eq!(token.consumed_at, Some(now));
        assert_eq!(token.service_used.as_deref(), Some("swarm_inference"));
    }
}
