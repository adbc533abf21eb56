use serde::{Deserialize, Serialize};

/// Which side of the market a trade moves.
///
/// A buy takes on long exposure against the collateral pool; a sell
/// unwinds it (short side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

/// Governance-controlled shape of the per-market volume window and its
/// flush cadence.
///
/// `blocks_per_flush` and `flush_interval_secs` are mutually exclusive;
/// block-count flushing wins when both are set, and zero disables a
/// cadence entirely. The choice is fixed per market at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotWindowConfig {
    /// Maximum number of historical snapshots held per market.
    pub capacity: usize,

    /// Recency weights, most-recent-weight first. Snapshots older than
    /// the table carry unit weight.
    pub decay_coefficients: Vec<u64>,

    /// Flush live counters every N blocks. Zero disables.
    pub blocks_per_flush: u64,

    /// Flush live counters on a wall-clock cadence. Zero disables.
    pub flush_interval_secs: i64,
}
