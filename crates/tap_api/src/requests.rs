//! API request types

use crate::ApiEndpoint;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tap_core::payment::PaymentProof;

/// Access purchase request
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RequestAccessRequest {
    /// Tier being purchased, by name
    pub tier: String,
    /// Proof of the settlement-side payment
    pub payment_proof: PaymentProof,
}

impl ApiEndpoint for RequestAccessRequest {
    const PATH: &'static str = "/access";
}

/// Token consumption request
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConsumeTokenRequest {
    /// The secret issued with the grant
    pub token: String,
    /// Service the token is being spent on
    pub service: String,
}

impl ApiEndpoint for ConsumeTokenRequest {
    const PATH: &'static str = "/access/consume";
}

/// Tier catalog listing request (no body)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListTiersRequest;

impl ApiEndpoint for ListTiersRequest {
    const PATH: &'static str = "/tiers";
}

/// Usage statistics request (no body; admin-gated)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UsageStatsRequest;

impl ApiEndpoint for UsageStatsRequest {
    const PATH: &'static str = "/stats";
}

/// Health check request (no body)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthCheckRequest;

impl ApiEndpoint for HealthCheckRequest {
    const PATH: &'static str = "/health";
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_access_round_trips() {
        let json = serde_json::json!({
            "tier": "enhanced",
            "payment_proof": {
                "signature": "5KtP3mZ",
                "sender": "tg:12345",
                "amount": 0.05,
                "timestamp": "2025-06-01T12:00:00Z"
            }
        });

        let request: RequestAccessRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.tier, "enhanced");
        assert_eq!(request.payment_proof.sender, "tg:12345");
        assert!(request.payment_proof.token_contract.is_none());
    }
}
