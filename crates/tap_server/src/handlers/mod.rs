//! HTTP request handlers

use axum::{
    Router,
    routing::{get, post},
};

pub mod access;
pub mod catalog;
pub mod health;
pub mod stats;

use crate::state::AppState;

/// Build all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    use tap_api::{ApiEndpoint, requests::*};

    Router::new()
        // Health check
        .route(HealthCheckRequest::PATH, get(health::health_check))
        // Tier catalog
        .route(ListTiersRequest::PATH, get(catalog::list_tiers))
        // Token lifecycle
        .route(RequestAccessRequest::PATH, post(access::request_access))
        .route(ConsumeTokenRequest::PATH, post(access::consume_token))
        // Operator surface
        .route(
            UsageStatsRequest::PATH,
            get(stats::usage_stats).route_layer(axum::middleware::from_fn_with_state(
                state,
                crate::middleware::require_admin,
            )),
        )
}
