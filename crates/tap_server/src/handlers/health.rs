//! Health check endpoint

use axum::{Json, extract::State};
use tap_api::responses::{HealthResponse, HealthStatus};

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: tap_api::API_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}
