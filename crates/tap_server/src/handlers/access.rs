//! Token lifecycle handlers

use axum::extract::{Json, State};
use tap_api::{
    ApiError, ApiResponse,
    requests::{ConsumeTokenRequest, RequestAccessRequest},
    responses::{AccessGrantResponse, ReceiptResponse},
};
use tap_core::Tier;

use crate::state::AppState;

/// Handle access purchase requests
///
/// Tier validation happens here at the string boundary; everything after
/// that is the protocol's job.
pub async fn request_access(
    State(state): State<AppState>,
    Json(request): Json<RequestAccessRequest>,
) -> Result<Json<ApiResponse<AccessGrantResponse>>, ApiError> {
    let tier: Tier = request.tier.parse().map_err(ApiError::from)?;

    let grant = state
        .protocol
        .request_access(tier, request.payment_proof)
        .await?;

    Ok(Json(ApiResponse::new(AccessGrantResponse {
        token: grant.secret.as_str().to_string(),
        token_id: grant.token_id,
        tier: grant.tier,
        expires_at: grant.expires_at,
        features: grant.features,
    })))
}

/// Handle token consumption requests
pub async fn consume_token(
    State(state): State<AppState>,
    Json(request): Json<ConsumeTokenRequest>,
) -> Result<Json<ApiResponse<ReceiptResponse>>, ApiError> {
    let receipt = state.protocol.consume(&request.token, &request.service)?;

    Ok(Json(ApiResponse::new(ReceiptResponse {
        token_id: receipt.token_id,
        tier: receipt.tier,
        features: receipt.features,
        remaining_access: receipt.expires_at,
        service: receipt.service,
    })))
}
