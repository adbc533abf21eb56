use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A denominated token amount as submitted by a trader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Well-formed iff the denom is non-empty and the amount positive.
    pub fn is_well_formed(&self) -> bool {
        !self.denom.is_empty() && self.amount > 0
    }
}

/// Ledger context the host supplies with every state transition.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub height: u64,
    pub time: DateTime<Utc>,
}

/// Price feed for synthetic denoms, quoted in the stable collateral denom.
pub trait Oracle {
    /// Current price, or `None` when the feed has no quote for the denom.
    fn current_price(&self, denom: &str) -> Option<Decimal>;
}

/// Token custody collaborator: balance checks, transfers between accounts,
/// and pool-side mint/burn.
///
/// `mint` and `burn` operate on the engine's pool account. All amounts are
/// exact integers; the implementation owns the bookkeeping.
pub trait TokenCustody {
    fn has_balance(&self, account: &str, denom: &str, amount: u128) -> bool;

    fn transfer(&mut self, from: &str, to: &str, denom: &str, amount: u128)
    -> anyhow::Result<()>;

    fn mint(&mut self, denom: &str, amount: u128) -> anyhow::Result<()>;

    fn burn(&mut self, denom: &str, amount: u128) -> anyhow::Result<()>;
}
