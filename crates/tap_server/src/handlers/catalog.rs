//! Tier catalog listing

use axum::{Json, extract::State};
use tap_api::{
    ApiResponse,
    responses::{TierCatalogResponse, TierInfoResponse},
};

use crate::state::AppState;

pub async fn list_tiers(State(state): State<AppState>) -> Json<ApiResponse<TierCatalogResponse>> {
    let tiers = state
        .protocol
        .catalog()
        .iter()
        .map(|(tier, config)| TierInfoResponse::from_config(tier, config))
        .collect();

    Json(ApiResponse::new(TierCatalogResponse { tiers }))
}
