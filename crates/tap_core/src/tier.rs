//! Tier catalog for TAP access levels
//!
//! Three named tiers gate swarm services: each carries a price in
//! settlement-token units, a token lifespan, a scheduling priority, and the
//! feature set unlocked by a token of that tier.

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::Duration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TapError;

/// A named access level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Enhanced,
    Premium,
}

impl Tier {
    /// All tiers, in catalog (price-ascending) order
    pub const ALL: [Tier; 3] = [Tier::Basic, Tier::Enhanced, Tier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Enhanced => "enhanced",
            Tier::Premium => "premium",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = TapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Tier::Basic),
            "enhanced" => Ok(Tier::Enhanced),
            "premium" => Ok(Tier::Premium),
            other => Err(TapError::InvalidTier {
                requested: other.to_string(),
                available: Tier::ALL.iter().map(|t| t.as_str().to_string()).collect(),
            }),
        }
    }
}

/// Relative scheduling priority granted by a tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Pricing and entitlement parameters for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TierConfig {
    /// Payment required, in settlement-token units
    pub price: f64,

    /// How long an issued token stays valid
    pub lifespan_hours: u32,

    /// Scheduling priority for requests carrying a token of this tier
    pub priority: Priority,

    /// Feature set unlocked by this tier
    pub features: Vec<String>,
}

impl TierConfig {
    /// Token lifespan as a chrono duration
    pub fn lifespan(&self) -> Duration {
        Duration::hours(i64::from(self.lifespan_hours))
    }
}

/// Per-tier overrides loaded from configuration
///
/// An override replaces the whole entry for that tier; omitted tiers keep
/// their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic: Option<TierConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced: Option<TierConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<TierConfig>,
}

impl TierOverrides {
    pub fn is_empty(&self) -> bool {
        self.basic.is_none() && self.enhanced.is_none() && self.premium.is_none()
    }
}

/// The full tier catalog
///
/// Total over [`Tier`]: every tier always has a config, so lookups are
/// infallible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCatalog {
    basic: TierConfig,
    enhanced: TierConfig,
    premium: TierConfig,
}

impl Default for TierCatalog {
    fn default() -> Self {
        Self {
            basic: TierConfig {
                price: 0.01,
                lifespan_hours: 1,
                priority: Priority::Low,
                features: vec!["standard_processing".to_string(), "basic_data".to_string()],
            },
            enhanced: TierConfig {
                price: 0.05,
                lifespan_hours: 6,
                priority: Priority::Medium,
                features: vec![
                    "higher_priority".to_string(),
                    "bundled_data".to_string(),
                    "extended_responses".to_string(),
                ],
            },
            premium: TierConfig {
                price: 0.10,
                lifespan_hours: 24,
                priority: Priority::High,
                features: vec![
                    "highest_priority".to_string(),
                    "persistent_logging".to_string(),
                    "premium_resources".to_string(),
                    "alpha_insights".to_string(),
                ],
            },
        }
    }
}

impl TierCatalog {
    /// Look up the config for a tier
    pub fn config(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Basic => &self.basic,
            Tier::Enhanced => &self.enhanced,
            Tier::Premium => &self.premium,
        }
    }

    /// Iterate tiers in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &TierConfig)> {
        [
            (Tier::Basic, &self.basic),
            (Tier::Enhanced, &self.enhanced),
            (Tier::Premium, &self.premium),
        ]
        .into_iter()
    }

    /// Replace entries with configured overrides
    pub fn apply_overrides(&mut self, overrides: &TierOverrides) {
        if let Some(basic) = &overrides.basic {
            self.basic = basic.clone();
        }
        if let Some(enhanced) = &overrides.enhanced {
            self.enhanced = enhanced.clone();
        }
        if let Some(premium) = &overrides.premium {
            self.premium = premium.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tier_parse_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(tier.as_str().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn test_unknown_tier_lists_alternatives() {
        let err = "platinum".parse::<Tier>().unwrap_err();
        match err {
            TapError::InvalidTier {
                requested,
                available,
            } => {
                assert_eq!(requested, "platinum");
                assert_eq!(available, vec!["basic", "enhanced", "premium"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_catalog_matches_protocol_constants() {
        let catalog = TierCatalog::default();

        let basic = catalog.config(Tier::Basic);
        assert_eq!(basic.price, 0.01);
        assert_eq!(basic.lifespan_hours, 1);
        assert_eq!(basic.priority, Priority::Low);
        assert_eq!(basic.features, vec!["standard_processing", "basic_data"]);

        let enhanced = catalog.config(Tier::Enhanced);
        assert_eq!(enhanced.price, 0.05);
        assert_eq!(enhanced.lifespan_hours, 6);
        assert_eq!(enhanced.priority, Priority::Medium);

        let premium = catalog.config(Tier::Premium);
        assert_eq!(premium.price, 0.10);
        assert_eq!(premium.lifespan_hours, 24);
        assert_eq!(premium.priority, Priority::High);
        assert_eq!(premium.features.len(), 4);
    }

    #[test]
    fn test_catalog_order_is_price_ascending() {
        let catalog = TierCatalog::default();
        let prices: Vec<f64> = catalog.iter().map(|(_, config)| config.price).collect();
        assert!(prices.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_overrides_replace_whole_entry() {
        let mut catalog = TierCatalog::default();
        let overrides = TierOverrides {
            premium: Some(TierConfig {
                price: 0.25,
                lifespan_hours: 48,
                priority: Priority::High,
                features: vec!["everything".to_string()],
            }),
            ..Default::default()
        };
        catalog.apply_overrides(&overrides);

        assert_eq!(catalog.config(Tier::Premium).price, 0.25);
        assert_eq!(catalog.config(Tier::Premium).features, vec!["everything"]);
        // untouched tiers keep defaults
        assert_eq!(catalog.config(Tier::Basic).price, 0.01);
    }
}
