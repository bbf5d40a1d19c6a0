//! Payment validation and settlement against the x402 service
//!
//! The protocol never inspects payment proofs itself: it forwards them to the
//! settlement endpoint and trusts the boolean verdict. Settlement recording
//! runs in the background after issuance and is advisory.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    config::SettlementConfig,
    error::{Result, TapError},
    tier::Tier,
};

/// A payment proof as submitted by the payer
///
/// Fields are forwarded verbatim to the settlement service; nothing here is
/// verified locally.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaymentProof {
    /// On-chain transaction signature
    pub signature: String,

    /// Settlement-side sender identifier
    pub sender: String,

    /// Amount the payer claims to have sent
    pub amount: f64,

    /// Token contract the payment was sent to, if the payer supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_contract: Option<String>,

    /// When the payer reports the payment was made
    pub timestamp: DateTime<Utc>,
}

/// Client-side view of the settlement service
#[async_trait]
pub trait SettlementClient: Send + Sync {
    /// Ask the settlement service whether `proof` covers `required_amount`.
    ///
    /// `Ok(false)` is a clean rejection; transport and HTTP failures are
    /// errors so callers can distinguish "declined" from "unreachable".
    async fn validate_payment(&self, proof: &PaymentProof, required_amount: f64) -> Result<bool>;

    /// Record the settlement for an already-issued grant
    async fn process_settlement(&self, proof: &PaymentProof, tier: Tier) -> Result<()>;
}

/// x402 settlement client over HTTP
pub struct X402Client {
    endpoint: String,
    wallet_key: Option<String>,
    token_contract: Option<String>,
    client: reqwest::Client,
}

impl X402Client {
    /// Create a client from settlement configuration
    pub fn new(config: &SettlementConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TapError::settlement("client_init", e))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            wallet_key: config.wallet_key.clone(),
            token_contract: config.token_contract.clone(),
            client,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.wallet_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    payment_proof: &'a PaymentProof,
    required_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_contract: Option<&'a str>,
}

#[derive(Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    valid: bool,
}

#[derive(Serialize)]
struct SettleRequest<'a> {
    payment_proof: &'a PaymentProof,
    tier: Tier,
    timestamp: DateTime<Utc>,
    service: &'static str,
}

#[async_trait]
impl SettlementClient for X402Client {
    async fn validate_payment(&self, proof: &PaymentProof, required_amount: f64) -> Result<bool> {
        let url = format!("{}/validate", self.endpoint);

        let response = self
            .authorized(self.client.post(&url))
            .json(&ValidateRequest {
                payment_proof: proof,
                required_amount,
                token_contract: self.token_contract.as_deref(),
            })
            .send()
            .await
            .map_err(|e| TapError::settlement("validate", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("x402 validation failed: {status}");
            return Err(TapError::settlement_status("validate", status));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| TapError::settlement("validate", e))?;

        Ok(body.valid)
    }

    async fn process_settlement(&self, proof: &PaymentProof, tier: Tier) -> Result<()> {
        let url = format!("{}/settle", self.endpoint);

        let response = self
            .authorized(self.client.post(&url))
            .json(&SettleRequest {
                payment_proof: proof,
                tier,
                timestamp: Utc::now(),
                service: "TAP",
            })
            .send()
            .await
            .map_err(|e| TapError::settlement("settle", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("x402 settlement failed: {status}");
            return Err(TapError::settlement_status("settle", status));
        }

        Ok(())
    }
}
