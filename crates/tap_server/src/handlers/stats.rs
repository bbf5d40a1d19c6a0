//! Usage statistics (operator surface)

use axum::{Json, extract::State};
use tap_api::{ApiResponse, responses::StatsResponse};

use crate::state::AppState;

pub async fn usage_stats(State(state): State<AppState>) -> Json<ApiResponse<StatsResponse>> {
    Json(ApiResponse::new(state.protocol.usage_stats().into()))
}
