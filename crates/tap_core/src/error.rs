use chrono::{DateTime, Utc};
use miette::Diagnostic;
use thiserror::Error;

use crate::id::TokenId;

#[derive(Error, Diagnostic, Debug)]
pub enum TapError {
    #[error("Unknown tier: {requested}")]
    #[diagnostic(
        code(tap_core::unknown_tier),
        help("Available tiers: {}", available.join(", "))
    )]
    InvalidTier {
        requested: String,
        available: Vec<String>,
    },

    #[error("Payment validation failed")]
    #[diagnostic(
        code(tap_core::payment_rejected),
        help("The settlement service rejected the proof. Required: {required_amount} for tier '{tier}'")
    )]
    PaymentRejected { tier: String, required_amount: f64 },

    #[error("Settlement request failed during {operation}")]
    #[diagnostic(
        code(tap_core::settlement_failed),
        help("Check connectivity and wallet credentials for the settlement endpoint")
    )]
    Settlement {
        operation: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Access token not found")]
    #[diagnostic(
        code(tap_core::token_not_found),
        help("The presented secret does not match any issued token")
    )]
    TokenNotFound,

    #[error("Access token already used")]
    #[diagnostic(
        code(tap_core::token_consumed),
        help("Token {token_id} was consumed at {consumed_at} for service '{service}'")
    )]
    TokenAlreadyConsumed {
        token_id: TokenId,
        service: String,
        consumed_at: DateTime<Utc>,
    },

    #[error("Access token expired")]
    #[diagnostic(
        code(tap_core::token_expired),
        help("Token {token_id} expired at {expired_at}")
    )]
    TokenExpired {
        token_id: TokenId,
        expired_at: DateTime<Utc>,
    },

    #[error("Configuration error")]
    #[diagnostic(
        code(tap_core::configuration_error),
        help("Check configuration file at {path}")
    )]
    Configuration {
        path: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Id(#[from] crate::id::IdError),
}

impl TapError {
    /// Settlement transport/protocol failure with an underlying cause
    pub fn settlement(
        operation: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Settlement {
            operation: operation.into(),
            cause: Box::new(cause),
        }
    }

    /// Settlement failure signalled by an unexpected HTTP status
    pub fn settlement_status(operation: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Settlement {
            operation: operation.into(),
            cause: format!("unexpected status {status}").into(),
        }
    }

    /// Configuration load/parse failure for the file at `path`
    pub fn configuration(
        path: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration {
            path: path.into(),
            cause: Box::new(cause),
        }
    }
}

pub type Result<T> = std::result::Result<T, TapError>;
