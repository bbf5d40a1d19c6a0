//! TAP Core - Tiered Access Protocol
//!
//! This crate implements the token lifecycle behind TAP, the tiered access
//! protocol used to monetize swarm services: a tier catalog, token issuance
//! against settlement-validated payments, single-use consumption, and expiry.

pub mod config;
pub mod error;
pub mod id;
pub mod payment;
pub mod protocol;
pub mod store;
pub mod sweeper;
pub mod tier;
pub mod token;

// Macros are automatically available at crate root due to #[macro_export]

pub use config::{SettlementConfig, TapConfig};
pub use error::{Result, TapError};
pub use id::{Id, IdType, TokenId};
pub use payment::{PaymentProof, SettlementClient, X402Client};
pub use protocol::{AccessGrant, AccessReceipt, TieredAccessProtocol};
pub use store::{TierUsage, TokenStore, UsageStats};
pub use sweeper::spawn_expiry_sweeper;
pub use tier::{Priority, Tier, TierCatalog, TierConfig, TierOverrides};
pub use token::{AccessToken, TokenSecret};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        AccessGrant, AccessReceipt, AccessToken, PaymentProof, Priority, Result, SettlementClient,
        TapConfig, TapError, Tier, TierCatalog, TierConfig, TieredAccessProtocol, TokenId,
        TokenSecret, TokenStore, UsageStats, X402Client,
    };
}
