//! TAP API types and definitions
//!
//! This crate defines the request/response types for the TAP API,
//! shared between server and client implementations.

pub mod error;
pub mod requests;
pub mod responses;

pub use error::ApiError;

// Re-export common types from tap-core
pub use tap_core::id::TokenId;
pub use tap_core::payment::PaymentProof;
pub use tap_core::tier::{Priority, Tier};

/// API version constant
pub const API_VERSION: &str = "v1";

/// An addressable API endpoint
pub trait ApiEndpoint {
    /// Route path, relative to the API root
    const PATH: &'static str;
}

/// Common metadata included in all responses
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResponseMetadata {
    /// API version
    pub version: String,
    /// Request ID for tracing
    pub request_id: uuid::Uuid,
    /// Timestamp of response
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Default for ResponseMetadata {
    fn default() -> Self {
        Self {
            version: API_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Standard API response wrapper
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    /// Response metadata
    pub meta: ResponseMetadata,
    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            meta: ResponseMetadata::default(),
            data,
        }
    }

    pub fn with_request_id(mut self, request_id: uuid::Uuid) -> Self {
        self.meta.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_envelope_carries_version() {
        let response = ApiResponse::new(42);
        assert_eq!(response.meta.version, API_VERSION);
        assert_eq!(response.data, 42);
    }
}
