//! In-memory token store
//!
//! Process-local and non-persistent: tokens are lost on restart. The primary
//! map is keyed by token id; a secondary index maps secret digests to ids so
//! lookup by presented secret needs no scan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TapError},
    id::TokenId,
    tier::Tier,
    token::{AccessToken, digest_secret},
};

/// Concurrent store for issued tokens
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: DashMap<TokenId, AccessToken>,
    by_digest: DashMap<String, TokenId>,
}

/// Usage counts for one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierUsage {
    pub total: usize,
    pub active: usize,
    pub consumed: usize,
}

/// Aggregate usage statistics across the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_tokens: usize,
    pub active_tokens: usize,
    pub consumed_tokens: usize,
    pub by_tier: HashMap<Tier, TierUsage>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly issued token
    ///
    /// The record lands before the digest index entry, so a concurrent
    /// lookup never sees an index hit without a backing record.
    pub fn insert(&self, token: AccessToken) {
        let digest = token.secret_digest.clone();
        let id = token.id;
        self.tokens.insert(id, token);
        self.by_digest.insert(digest, id);
    }

    /// Look up a token by the payer-presented secret
    pub fn find_by_secret(&self, secret: &str) -> Option<AccessToken> {
        let digest = digest_secret(secret);
        let id = *self.by_digest.get(&digest)?;
        self.tokens.get(&id).map(|entry| entry.clone())
    }

    /// Atomically consume the token matching `secret` for `service`
    ///
    /// The consumed-check and the mark happen under the shard lock of the
    /// primary map entry, so concurrent consumers of the same secret race to
    /// exactly one success.
    pub fn consume(&self, secret: &str, service: &str, now: DateTime<Utc>) -> Result<AccessToken> {
        let digest = digest_secret(secret);
        let id = *self
            .by_digest
            .get(&digest)
            .ok_or(TapError::TokenNotFound)?;

        let mut entry = self.tokens.get_mut(&id).ok_or(TapError::TokenNotFound)?;

        if let Some(consumed_at) = entry.consumed_at {
            return Err(TapError::TokenAlreadyConsumed {
                token_id: id,
                service: entry.service_used.clone().unwrap_or_default(),
                consumed_at,
            });
        }

        if entry.is_expired(now) {
            return Err(TapError::TokenExpired {
                token_id: id,
                expired_at: entry.expires_at,
            });
        }

        entry.mark_consumed(service, now);
        Ok(entry.clone())
    }

    /// Remove expired tokens from both maps, returning the removed ids
    ///
    /// Consumed-but-unexpired tokens stay: they still count toward usage
    /// statistics until their expiry passes.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<TokenId> {
        let expired: Vec<TokenId> = self
            .tokens
            .iter()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| *entry.key())
            .collect();

        for id in &expired {
            if let Some((_, token)) = self.tokens.remove(id) {
                self.by_digest.remove(&token.secret_digest);
            }
        }

        expired
    }

    /// Aggregate usage counts, bucketed per tier
    pub fn usage_stats(&self) -> UsageStats {
        let mut by_tier: HashMap<Tier, TierUsage> = Tier::ALL
            .iter()
            .map(|tier| (*tier, TierUsage::default()))
            .collect();

        let mut total = 0;
        let mut consumed = 0;

        for entry in self.tokens.iter() {
            total += 1;
            let bucket = by_tier.entry(entry.tier).or_default();
            bucket.total += 1;
            if entry.is_consumed() {
                consumed += 1;
                bucket.consumed += 1;
            } else {
                bucket.active += 1;
            }
        }

        UsageStats {
            total_tokens: total,
            active_tokens: total - consumed,
            consumed_tokens: consumed,
            by_tier,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
