//! API error types

use miette::{Diagnostic, JSONReportHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tap_core::TapError;

/// API error response
#[derive(Debug, thiserror::Error, Diagnostic, Serialize, Deserialize)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation failed: {message}")]
    #[diagnostic(
        code(api::validation_error),
        help("Check the field errors for specific validation issues")
    )]
    ValidationError {
        message: String,
        fields: Option<Vec<FieldError>>,
    },

    /// Authentication required
    #[error("Authentication required")]
    #[diagnostic(
        code(api::unauthorized),
        help("Please provide valid authentication credentials")
    )]
    Unauthorized { message: Option<String> },

    /// Payment validation failed
    #[error("Payment required")]
    #[diagnostic(
        code(api::payment_required),
        help("The settlement service rejected the proof: {required_amount} required for tier '{tier}'")
    )]
    PaymentRequired { tier: String, required_amount: f64 },

    /// Resource not found
    #[error("Resource not found: {resource_type}")]
    #[diagnostic(
        code(api::not_found),
        help("The {resource_type} with ID '{resource_id}' does not exist")
    )]
    NotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Conflict with existing resource state
    #[error("Resource conflict")]
    #[diagnostic(
        code(api::conflict),
        help("The resource already exists or is in a conflicting state")
    )]
    Conflict { message: String },

    /// Resource permanently gone
    #[error("Resource expired")]
    #[diagnostic(code(api::gone), help("The resource has passed its expiry"))]
    Gone { message: String },

    /// The settlement upstream failed or was unreachable
    #[error("Settlement service unavailable")]
    #[diagnostic(
        code(api::settlement_unavailable),
        help("The upstream settlement service could not be reached; try again later")
    )]
    SettlementUnavailable { message: String },

    /// Core error from tap-core
    #[error("{message}")]
    #[diagnostic(code(api::core_error), help("Core operation failed"))]
    Core { message: String, json: String },

    /// JSON error
    #[error("{message}")]
    #[diagnostic(
        code(api::json_error),
        help("Check that your JSON is valid and matches the expected schema")
    )]
    Json { message: String, json: String },

    /// Service temporarily unavailable
    #[error("Service temporarily unavailable")]
    #[diagnostic(
        code(api::service_unavailable),
        help("The service is temporarily down for maintenance")
    )]
    ServiceUnavailable { retry_after_seconds: Option<u64> },
}

/// Field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized { .. } => 401,
            ApiError::PaymentRequired { .. } => 402,
            ApiError::NotFound { .. } => 404,
            ApiError::Conflict { .. } => 409,
            ApiError::Gone { .. } => 410,
            ApiError::SettlementUnavailable { .. } => 502,
            ApiError::ServiceUnavailable { .. } => 503,

            // tap-core errors
            ApiError::Core { .. } => 500,

            // External errors
            ApiError::Json { .. } => 400,
        }
    }

    /// Create a validation error with field details
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            fields: None,
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }
}

// Conversion implementations
impl From<TapError> for ApiError {
    fn from(err: TapError) -> Self {
        match err {
            TapError::InvalidTier {
                requested,
                available,
            } => Self::validation(format!(
                "Unknown tier '{requested}'. Available tiers: {}",
                available.join(", ")
            )),
            TapError::PaymentRejected {
                tier,
                required_amount,
            } => Self::PaymentRequired {
                tier,
                required_amount,
            },
            TapError::Settlement { .. } => Self::SettlementUnavailable {
                message: err.to_string(),
            },
            TapError::TokenNotFound => Self::not_found("access_token", "presented secret"),
            TapError::TokenAlreadyConsumed {
                token_id,
                service,
                consumed_at,
            } => Self::Conflict {
                message: format!(
                    "Access token {token_id} was already consumed at {consumed_at} for service '{service}'"
                ),
            },
            TapError::TokenExpired {
                token_id,
                expired_at,
            } => Self::Gone {
                message: format!("Access token {token_id} expired at {expired_at}"),
            },
            other => {
                let handler = JSONReportHandler::new();

                let message = format!("{}", other);
                let mut json = String::new();

                let err: Box<dyn Diagnostic> = Box::new(other);
                handler
                    .render_report(&mut json, err.as_ref())
                    .unwrap_or_default();

                Self::Core { message, json }
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        // Create a miette diagnostic for better error reporting
        let diagnostic = miette::miette!(
            code = "json::parse_error",
            help = "Check that your JSON is valid",
            "{}",
            err
        );

        let handler = JSONReportHandler::new();
        let message = err.to_string();
        let mut json = String::new();

        handler
            .render_report(&mut json, diagnostic.as_ref())
            .unwrap_or_default();

        Self::Json { message, json }
    }
}

// Server-side response conversion
#[cfg(feature = "server")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Convert error to a serializable format
        let error_message = self.to_string();
        let error_type = match &self {
            ApiError::ValidationError { .. } => "validation_error",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::PaymentRequired { .. } => "payment_required",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::Gone { .. } => "expired",
            ApiError::SettlementUnavailable { .. } => "settlement_unavailable",
            ApiError::Core { .. } => "core_error",
            ApiError::Json { .. } => "json_error",
            ApiError::ServiceUnavailable { .. } => "service_unavailable",
        };

        // Extract detail if available
        let detail = match &self {
            ApiError::Core { json, .. } => Some(json),
            ApiError::Json { json, .. } => Some(json),
            _ => None,
        };

        // Create error response body with optional detail
        let mut error_obj = serde_json::json!({
            "type": error_type,
            "message": error_message,
        });

        if let Some(d) = detail {
            error_obj["detail"] = serde_json::to_value(d).unwrap_or_default();
        }

        let body = serde_json::json!({
            "error": error_obj,
            "timestamp": chrono::Utc::now(),
        });

        (status, Json(body)).into_response()
    }
}
