use std::collections::HashMap;

use chrono::{DateTime, Utc};

use market::balance::MarketBalance;
use market::types::SnapshotWindowConfig;

/// Explicit denom → `MarketBalance` store, owned by the orchestrator.
///
/// Markets are created lazily by the first trade on a denom and never
/// deleted. Instances are mutually independent; there is no cross-denom
/// ordering concern.
#[derive(Debug, Default)]
pub struct MarketStore {
    markets: HashMap<String, MarketBalance>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_or_create(
        &mut self,
        denom: &str,
        cfg: &SnapshotWindowConfig,
        now: DateTime<Utc>,
    ) -> &mut MarketBalance {
        self.markets
            .entry(denom.to_string())
            .or_insert_with(|| MarketBalance::new(denom, cfg, now))
    }

    pub fn get(&self, denom: &str) -> Option<&MarketBalance> {
        self.markets.get(denom)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MarketBalance> {
        self.markets.values_mut()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}
