//! Server error types

use axum::response::{IntoResponse, Response};
use tap_api::ApiError;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Core error: {0}")]
    Core(#[from] tap_core::TapError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Convert to ApiError for consistent error responses
        let api_error = match self {
            ServerError::Core(e) => ApiError::from(e),
            ServerError::Api(e) => e,
            ServerError::Config(_msg) => ApiError::ServiceUnavailable {
                retry_after_seconds: None,
            },
            _ => ApiError::ServiceUnavailable {
                retry_after_seconds: Some(30),
            },
        };

        api_error.into_response()
    }
}
