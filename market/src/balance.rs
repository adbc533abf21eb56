//! Per-market aggregate of live volume, flushed history, and derived skew.
//!
//! Responsibilities:
//!   • Accumulate live long/short volume as trades settle
//!   • Recompute the imbalance on every live-volume mutation
//!   • Freeze live counters into the snapshot window on a fixed cadence
//!     (block count or wall-clock interval), driven by the per-block tick
//!
//! A `MarketBalance` is created lazily by the first trade on a denom and
//! is never deleted. Instances are mutually independent across denoms.

use chrono::{DateTime, Duration, Utc};

use crate::imbalance::{self, Direction, Imbalance};
use crate::types::{Side, SnapshotWindowConfig};
use crate::window::VolumeWindow;

/// Flush cadence for one market, fixed at creation from
/// `SnapshotWindowConfig`. Zero limits/intervals mean disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushScheduler {
    Disabled,
    ByBlockCount {
        limit: u64,
        count_since_flush: u64,
    },
    ByInterval {
        interval: Duration,
        next_deadline: DateTime<Utc>,
    },
}

impl FlushScheduler {
    pub fn from_config(cfg: &SnapshotWindowConfig, now: DateTime<Utc>) -> Self {
        if cfg.blocks_per_flush > 0 {
            FlushScheduler::ByBlockCount {
                limit: cfg.blocks_per_flush,
                count_since_flush: 0,
            }
        } else if cfg.flush_interval_secs > 0 {
            let interval = Duration::seconds(cfg.flush_interval_secs);
            FlushScheduler::ByInterval {
                interval,
                next_deadline: now + interval,
            }
        } else {
            FlushScheduler::Disabled
        }
    }

    /// Advance one block; true when a flush is due.
    fn due(&mut self, block_time: DateTime<Utc>) -> bool {
        match self {
            FlushScheduler::Disabled => false,
            FlushScheduler::ByBlockCount {
                limit,
                count_since_flush,
            } => {
                if *limit == 0 {
                    return false;
                }
                *count_since_flush += 1;
                if *count_since_flush >= *limit {
                    *count_since_flush = 0;
                    true
                } else {
                    false
                }
            }
            FlushScheduler::ByInterval {
                interval,
                next_deadline,
            } => {
                if block_time >= *next_deadline {
                    *next_deadline = block_time + *interval;
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Live market-balance state for one synthetic denom.
#[derive(Debug, Clone)]
pub struct MarketBalance {
    denom: String,
    live_long_volume: u128,
    live_short_volume: u128,
    imbalance: Imbalance,
    window: VolumeWindow,
    scheduler: FlushScheduler,
}

impl MarketBalance {
    pub fn new(
        denom: impl Into<String>,
        cfg: &SnapshotWindowConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            denom: denom.into(),
            live_long_volume: 0,
            live_short_volume: 0,
            imbalance: Imbalance::balanced(),
            window: VolumeWindow::new(cfg.capacity, cfg.decay_coefficients.clone()),
            scheduler: FlushScheduler::from_config(cfg, now),
        }
    }

    pub fn denom(&self) -> &str {
        &self.denom
    }

    pub fn imbalance(&self) -> Imbalance {
        self.imbalance
    }

    pub fn window(&self) -> &VolumeWindow {
        &self.window
    }

    pub fn live_volumes(&self) -> (u128, u128) {
        (self.live_long_volume, self.live_short_volume)
    }

    pub fn increase_long(&mut self, amount: u128) {
        self.live_long_volume = self.live_long_volume.saturating_add(amount);
        self.recalculate();
    }

    pub fn increase_short(&mut self, amount: u128) {
        self.live_short_volume = self.live_short_volume.saturating_add(amount);
        self.recalculate();
    }

    /// Refresh the imbalance from effective volumes: the weighted window
    /// plus the not-yet-flushed live counters, which participate as an
    /// unweighted extra snapshot. Both sides use the weighted totals.
    fn recalculate(&mut self) {
        let (weighted_long, weighted_short) = self.window.weighted();
        let eff_long = weighted_long.saturating_add(self.live_long_volume);
        let eff_short = weighted_short.saturating_add(self.live_short_volume);
        self.imbalance = Imbalance::from_effective(eff_long, eff_short);
    }

    /// Dynamic fee for a trade of `amount`, charged only while the trade
    /// would deepen the existing skew.
    pub fn fee_for_direction(&self, amount: u128, side: Side) -> u128 {
        let deepens = matches!(
            (side, self.imbalance.direction),
            (Side::Long, Direction::LongHeavy) | (Side::Short, Direction::ShortHeavy)
        );
        if deepens {
            imbalance::fee_for_amount(amount, self.imbalance.ratio)
        } else {
            0
        }
    }

    /// End-of-block hook. Returns true when the scheduler flushed.
    pub fn tick(&mut self, block_height: u64, block_time: DateTime<Utc>) -> bool {
        if self.scheduler.due(block_time) {
            self.flush();
            tracing::debug!(
                denom = %self.denom,
                height = block_height,
                window_len = self.window.len(),
                "scheduled volume flush"
            );
            true
        } else {
            false
        }
    }

    /// Freeze live counters into the window, zero them, and reset the skew.
    pub fn flush(&mut self) {
        self.window
            .add_snapshot(self.live_long_volume, self.live_short_volume);
        self.live_long_volume = 0;
        self.live_short_volume = 0;
        self.imbalance = Imbalance::balanced();
    }
}
