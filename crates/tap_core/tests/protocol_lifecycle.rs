//! End-to-end tests for the token lifecycle: issue, consume, expire.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;
use tap_core::{
    PaymentProof, Result, SettlementClient, TapError, Tier, TierCatalog, TieredAccessProtocol,
};

#[derive(Clone, Copy)]
enum Verdict {
    Accept,
    Reject,
    Unreachable,
}

/// Scripted settlement client, in the spirit of a mock model provider
struct ScriptedSettlement {
    verdict: Verdict,
    validations: AtomicUsize,
    settlements: AtomicUsize,
}

impl ScriptedSettlement {
    fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            validations: AtomicUsize::new(0),
            settlements: AtomicUsize::new(0),
        }
    }

    fn accepting() -> Self {
        Self::with_verdict(Verdict::Accept)
    }

    fn rejecting() -> Self {
        Self::with_verdict(Verdict::Reject)
    }

    fn unreachable() -> Self {
        Self::with_verdict(Verdict::Unreachable)
    }
}

#[async_trait]
impl SettlementClient for ScriptedSettlement {
    async fn validate_payment(&self, _proof: &PaymentProof, _required: f64) -> Result<bool> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Verdict::Accept => Ok(true),
            Verdict::Reject => Ok(false),
            Verdict::Unreachable => Err(TapError::Settlement {
                operation: "validate".to_string(),
                cause: "connection refused".into(),
            }),
        }
    }

    async fn process_settlement(&self, _proof: &PaymentProof, _tier: Tier) -> Result<()> {
        self.settlements.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn proof(amount: f64) -> PaymentProof {
    PaymentProof {
        signature: "4vXq81TxSig".to_string(),
        sender: "tg:8675309".to_string(),
        amount,
        token_contract: Some("SMOLabc123".to_string()),
        timestamp: Utc::now(),
    }
}

fn protocol(settlement: Arc<ScriptedSettlement>) -> TieredAccessProtocol {
    TieredAccessProtocol::new(TierCatalog::default(), settlement)
}

#[tokio::test]
async fn issue_then_consume_happy_path() {
    let settlement = Arc::new(ScriptedSettlement::accepting());
    let tap = protocol(Arc::clone(&settlement));

    let grant = tap.request_access(Tier::Enhanced, proof(0.05)).await.unwrap();
    assert_eq!(grant.tier, Tier::Enhanced);
    assert_eq!(
        grant.features,
        vec!["higher_priority", "bundled_data", "extended_responses"]
    );
    assert!(grant.expires_at > Utc::now());

    let receipt = tap.consume(grant.secret.as_str(), "bundled_data").unwrap();
    assert_eq!(receipt.token_id, grant.token_id);
    assert_eq!(receipt.tier, Tier::Enhanced);
    assert_eq!(receipt.expires_at, grant.expires_at);
    assert_eq!(receipt.service, "bundled_data");

    assert_eq!(settlement.validations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn settlement_fires_in_background() {
    let settlement = Arc::new(ScriptedSettlement::accepting());
    let tap = protocol(Arc::clone(&settlement));

    tap.request_access(Tier::Basic, proof(0.01)).await.unwrap();

    // the settlement task was spawned; give it a moment to run
    for _ in 0..50 {
        if settlement.settlements.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(settlement.settlements.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_payment_issues_nothing() {
    let settlement = Arc::new(ScriptedSettlement::rejecting());
    let tap = protocol(Arc::clone(&settlement));

    let err = tap
        .request_access(Tier::Premium, proof(0.10))
        .await
        .unwrap_err();
    match err {
        TapError::PaymentRejected {
            tier,
            required_amount,
        } => {
            assert_eq!(tier, "premium");
            assert_eq!(required_amount, 0.10);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(tap.usage_stats().total_tokens, 0);
    // no settlement attempt for a rejected payment
    assert_eq!(settlement.settlements.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_settlement_is_not_a_rejection() {
    let settlement = Arc::new(ScriptedSettlement::unreachable());
    let tap = protocol(settlement);

    let err = tap
        .request_access(Tier::Basic, proof(0.01))
        .await
        .unwrap_err();
    assert!(matches!(err, TapError::Settlement { .. }));
}

#[tokio::test]
async fn double_consume_is_rejected() {
    let settlement = Arc::new(ScriptedSettlement::accepting());
    let tap = protocol(settlement);

    let grant = tap.request_access(Tier::Basic, proof(0.01)).await.unwrap();
    tap.consume(grant.secret.as_str(), "standard_processing")
        .unwrap();

    let err = tap
        .consume(grant.secret.as_str(), "standard_processing")
        .unwrap_err();
    match err {
        TapError::TokenAlreadyConsumed {
            token_id, service, ..
        } => {
            assert_eq!(token_id, grant.token_id);
            assert_eq!(service, "standard_processing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_secret_is_not_found() {
    let settlement = Arc::new(ScriptedSettlement::accepting());
    let tap = protocol(settlement);

    let err = tap.consume("deadbeef", "anything").unwrap_err();
    assert!(matches!(err, TapError::TokenNotFound));
}

#[tokio::test]
async fn stats_track_the_lifecycle() {
    let settlement = Arc::new(ScriptedSettlement::accepting());
    let tap = protocol(settlement);

    let first = tap.request_access(Tier::Basic, proof(0.01)).await.unwrap();
    tap.request_access(Tier::Premium, proof(0.10)).await.unwrap();

    tap.consume(first.secret.as_str(), "basic_data").unwrap();

    let stats = tap.usage_stats();
    assert_eq!(stats.total_tokens, 2);
    assert_eq!(stats.active_tokens, 1);
    assert_eq!(stats.consumed_tokens, 1);
    assert_eq!(stats.by_tier[&Tier::Basic].consumed, 1);
    assert_eq!(stats.by_tier[&Tier::Premium].active, 1);
}
