//! Governance-controlled configuration.
//!
//! The engine treats these as in-memory values per call; how the host
//! persists them is out of scope here. Nominee-gated mutation happens
//! through the engine's governance entry points.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use market::fee::FeeConfig;
use market::types::SnapshotWindowConfig;

/// One enabled synthetic denomination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticAsset {
    pub denom: String,
    pub active: bool,
}

/// Set of known synthetic denominations, each independently toggled by a
/// nominee. A denom must be present *and* active to trade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntheticAssetConfig {
    assets: HashMap<String, SyntheticAsset>,
}

impl SyntheticAssetConfig {
    pub fn from_denoms(denoms: impl IntoIterator<Item = String>) -> Self {
        let mut config = Self::default();
        for denom in denoms {
            config.insert(&denom);
        }
        config
    }

    pub fn contains(&self, denom: &str) -> bool {
        self.assets.contains_key(denom)
    }

    pub fn is_active(&self, denom: &str) -> bool {
        self.assets.get(denom).is_some_and(|asset| asset.active)
    }

    /// Enable a new denom. Overwrites nothing; callers check `contains`.
    pub fn insert(&mut self, denom: &str) {
        self.assets.insert(
            denom.to_string(),
            SyntheticAsset {
                denom: denom.to_string(),
                active: true,
            },
        );
    }

    /// Toggle an existing denom; false when the denom is unknown.
    pub fn set_active(&mut self, denom: &str, active: bool) -> bool {
        match self.assets.get_mut(denom) {
            Some(asset) => {
                asset.active = active;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Allow-listed accounts permitted to mutate governance configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NomineeSet(HashSet<String>);

impl NomineeSet {
    pub fn contains(&self, account: &str) -> bool {
        self.0.contains(account)
    }
}

impl FromIterator<String> for NomineeSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Full engine configuration as loaded from the host's parameter store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Stable collateral denom trades settle in.
    pub stable_denom: String,

    /// Account holding pooled collateral, controlled by the engine itself.
    pub pool_account: String,

    pub fee: FeeConfig,
    pub window: SnapshotWindowConfig,

    /// Denoms enabled at genesis.
    pub assets: Vec<String>,

    pub nominees: Vec<String>,
}

impl ExchangeConfig {
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let raw = r#"{
            "stable_denom": "usdr",
            "pool_account": "exchange-pool",
            "fee": { "numerator": 1003, "denominator": 1000, "minimum": 1 },
            "window": {
                "capacity": 11,
                "decay_coefficients": [100, 90, 80, 70, 60, 50, 40, 30, 20, 10],
                "blocks_per_flush": 0,
                "flush_interval_secs": 3600
            },
            "assets": ["xau", "xag"],
            "nominees": ["validator-1"]
        }"#;

        let config = ExchangeConfig::from_json_str(raw).unwrap();
        assert_eq!(config.stable_denom, "usdr");
        assert_eq!(config.window.capacity, 11);
        assert_eq!(config.window.decay_coefficients.len(), 10);
        assert_eq!(config.assets, vec!["xau", "xag"]);
    }

    #[test]
    fn asset_config_toggles_independently() {
        let mut assets = SyntheticAssetConfig::from_denoms(["xau".to_string()]);
        assert!(assets.is_active("xau"));
        assert!(!assets.is_active("xag"));

        assert!(assets.set_active("xau", false));
        assert!(assets.contains("xau"));
        assert!(!assets.is_active("xau"));

        assert!(!assets.set_active("xag", false));
    }
}
