//! TAP API Server library
//!
//! Core server implementation for the Tiered Access Protocol's HTTP API

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use state::AppState;

/// Start the TAP API server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    use axum::Router;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    tracing::info!("Starting TAP API server on {}", config.bind_address);

    // Create app state
    let state = AppState::new(config.clone())?;

    // Periodic expiry sweep runs for the life of the server
    let sweeper = tap_core::spawn_expiry_sweeper(
        Arc::clone(&state.protocol),
        config.tap.sweep_interval(),
    );

    // Build router
    let app = Router::new()
        .nest("/api/v1", handlers::routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address
    let addr: SocketAddr = config.bind_address.parse()?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let served = axum::serve(listener, app).await;

    sweeper.abort();
    served?;

    Ok(())
}
