//! Exchange orchestrator.
//!
//! This module owns the Buy/Sell entry points of the synthetic-asset
//! exchange. Responsibilities:
//!   • Validate trade requests against governance configuration
//!   • Convert synthetic amounts to collateral cost at the oracle price
//!   • Combine the flat protocol fee with the imbalance-driven dynamic fee
//!   • Drive the token custody collaborator (transfers, mint, burn)
//!   • Update per-market balance state and run the per-block flush tick
//!
//! The host ledger executes one state transition at a time to completion,
//! so the engine is strictly synchronous. Each trade's custody steps are
//! one atomic unit under the host's transaction boundary: a custody call
//! failing after the up-front balance check is an invariant violation and
//! panics instead of returning a typed error.

use common::logger::TraceId;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use market::balance::MarketBalance;
use market::error::MarketError;
use market::fee::FlatFee;
use market::types::{Side, SnapshotWindowConfig};

use crate::config::{ExchangeConfig, NomineeSet, SyntheticAssetConfig};
use crate::error::ExchangeError;
use crate::store::MarketStore;
use crate::types::{Block, Coin, Oracle, TokenCustody};

/// Outcome of a settled trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub denom: String,
    /// Synthetic units bought or sold.
    pub amount: u128,
    /// Oracle cost of `amount`, in the stable denom.
    pub cost: u128,
    pub flat_fee: u128,
    pub dynamic_fee: u128,
    /// Stable-denom units moved: total paid on a buy, proceeds on a sell.
    pub settled: u128,
}

/// Governance parameters the engine trades under.
#[derive(Debug, Clone)]
pub struct ExchangeParams {
    pub stable_denom: String,
    pub pool_account: String,
    pub fee: FlatFee,
    pub window: SnapshotWindowConfig,
    pub assets: SyntheticAssetConfig,
    pub nominees: NomineeSet,
}

pub struct ExchangeEngine<O: Oracle, C: TokenCustody> {
    oracle: O,
    custody: C,
    params: ExchangeParams,
    markets: MarketStore,
}

impl<O: Oracle, C: TokenCustody> ExchangeEngine<O, C> {
    pub fn new(oracle: O, custody: C, params: ExchangeParams) -> Self {
        Self {
            oracle,
            custody,
            params,
            markets: MarketStore::new(),
        }
    }

    pub fn from_config(
        oracle: O,
        custody: C,
        cfg: &ExchangeConfig,
    ) -> Result<Self, ExchangeError> {
        let params = ExchangeParams {
            stable_denom: cfg.stable_denom.clone(),
            pool_account: cfg.pool_account.clone(),
            fee: FlatFee::from_config(&cfg.fee)?,
            window: cfg.window.clone(),
            assets: SyntheticAssetConfig::from_denoms(cfg.assets.iter().cloned()),
            nominees: cfg.nominees.iter().cloned().collect(),
        };
        Ok(Self::new(oracle, custody, params))
    }

    pub fn params(&self) -> &ExchangeParams {
        &self.params
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn market(&self, denom: &str) -> Option<&MarketBalance> {
        self.markets.get(denom)
    }

    /// Convert an amount of `denom` into stable collateral at the current
    /// oracle price, flooring to whole units.
    fn cost_of(&self, denom: &str, amount: u128) -> Result<u128, ExchangeError> {
        let price = self
            .oracle
            .current_price(denom)
            .filter(|price| *price > Decimal::ZERO)
            .ok_or_else(|| ExchangeError::NoOraclePrice(denom.to_string()))?;

        let amount =
            Decimal::from_u128(amount).ok_or(ExchangeError::Market(MarketError::Overflow))?;
        let cost = price
            .checked_mul(amount)
            .ok_or(ExchangeError::Market(MarketError::Overflow))?
            .floor()
            .to_u128()
            .ok_or(ExchangeError::Market(MarketError::Overflow))?;

        if cost == 0 {
            return Err(ExchangeError::Market(MarketError::AmountTooSmall));
        }
        Ok(cost)
    }

    fn ensure_tradeable(&self, coin: &Coin) -> Result<(), ExchangeError> {
        if !coin.is_well_formed() {
            return Err(ExchangeError::InvalidAmount);
        }
        if !self.params.assets.is_active(&coin.denom) {
            return Err(ExchangeError::AssetNotEnabled(coin.denom.clone()));
        }
        Ok(())
    }

    /// Buy `coin.amount` of the synthetic denom against stable collateral.
    ///
    /// The buyer pays oracle cost plus the flat protocol fee plus the
    /// dynamic fee (charged only while buys deepen a long-heavy skew); the
    /// engine mints the synthetic units into the pool and pays them out.
    pub fn buy(
        &mut self,
        block: &Block,
        buyer: &str,
        coin: &Coin,
    ) -> Result<TradeReceipt, ExchangeError> {
        let trace = TraceId::default();
        self.ensure_tradeable(coin)?;

        let cost = self.cost_of(&coin.denom, coin.amount)?;
        let dynamic_fee = self
            .markets
            .load_or_create(&coin.denom, &self.params.window, block.time)
            .fee_for_direction(cost, Side::Long);

        let marked_up = self.params.fee.add_to_amount(cost)?;
        let flat_fee = marked_up - cost;
        let total = marked_up
            .checked_add(dynamic_fee)
            .ok_or(ExchangeError::Market(MarketError::Overflow))?;

        if !self
            .custody
            .has_balance(buyer, &self.params.stable_denom, total)
        {
            return Err(ExchangeError::InsufficientFunds {
                account: buyer.to_string(),
                denom: self.params.stable_denom.clone(),
                needed: total,
            });
        }

        // Funds were just checked; custody failures past this point are
        // invariant violations, not user errors.
        let pool = self.params.pool_account.clone();
        let stable = self.params.stable_denom.clone();
        expect_custody(
            self.custody.transfer(buyer, &pool, &stable, total),
            "buy collateral transfer",
        );
        expect_custody(self.custody.mint(&coin.denom, coin.amount), "buy mint");
        expect_custody(
            self.custody.transfer(&pool, buyer, &coin.denom, coin.amount),
            "buy payout transfer",
        );

        self.markets
            .load_or_create(&coin.denom, &self.params.window, block.time)
            .increase_long(total);

        tracing::info!(
            trace_id = %trace,
            height = block.height,
            denom = %coin.denom,
            amount = coin.amount,
            cost,
            flat_fee,
            dynamic_fee,
            total,
            "buy settled"
        );

        Ok(TradeReceipt {
            denom: coin.denom.clone(),
            amount: coin.amount,
            cost,
            flat_fee,
            dynamic_fee,
            settled: total,
        })
    }

    /// Sell `coin.amount` of the synthetic denom back into stable
    /// collateral.
    ///
    /// The seller receives oracle cost marked down by the flat protocol
    /// fee, minus the dynamic fee (charged only while sells deepen a
    /// short-heavy skew); the sold units are escrowed to the pool and
    /// burned.
    pub fn sell(
        &mut self,
        block: &Block,
        seller: &str,
        coin: &Coin,
    ) -> Result<TradeReceipt, ExchangeError> {
        let trace = TraceId::default();
        self.ensure_tradeable(coin)?;

        if !self.custody.has_balance(seller, &coin.denom, coin.amount) {
            return Err(ExchangeError::InsufficientFunds {
                account: seller.to_string(),
                denom: coin.denom.clone(),
                needed: coin.amount,
            });
        }

        let cost = self.cost_of(&coin.denom, coin.amount)?;
        let dynamic_fee = self
            .markets
            .load_or_create(&coin.denom, &self.params.window, block.time)
            .fee_for_direction(cost, Side::Short);

        let marked_down = self.params.fee.sub_from_amount(cost)?;
        let flat_fee = cost - marked_down;
        let proceeds = marked_down
            .checked_sub(dynamic_fee)
            .filter(|proceeds| *proceeds > 0)
            .ok_or(ExchangeError::Market(MarketError::AmountTooSmall))?;

        // Holdings were just checked; custody failures past this point are
        // invariant violations, not user errors.
        let pool = self.params.pool_account.clone();
        let stable = self.params.stable_denom.clone();
        expect_custody(
            self.custody.transfer(seller, &pool, &coin.denom, coin.amount),
            "sell escrow transfer",
        );
        expect_custody(self.custody.burn(&coin.denom, coin.amount), "sell burn");
        expect_custody(
            self.custody.transfer(&pool, seller, &stable, proceeds),
            "sell payout transfer",
        );

        self.markets
            .load_or_create(&coin.denom, &self.params.window, block.time)
            .increase_short(proceeds);

        tracing::info!(
            trace_id = %trace,
            height = block.height,
            denom = %coin.denom,
            amount = coin.amount,
            cost,
            flat_fee,
            dynamic_fee,
            proceeds,
            "sell settled"
        );

        Ok(TradeReceipt {
            denom: coin.denom.clone(),
            amount: coin.amount,
            cost,
            flat_fee,
            dynamic_fee,
            settled: proceeds,
        })
    }

    /// Enable a new synthetic denom. Nominee-gated.
    pub fn add_asset(&mut self, caller: &str, denom: &str) -> Result<(), ExchangeError> {
        self.ensure_nominee(caller)?;
        if self.params.assets.contains(denom) {
            return Err(ExchangeError::DuplicateAsset(denom.to_string()));
        }
        self.params.assets.insert(denom);
        tracing::info!(caller, denom, "synthetic asset enabled");
        Ok(())
    }

    /// Toggle an existing synthetic denom. Nominee-gated.
    pub fn update_asset(
        &mut self,
        caller: &str,
        denom: &str,
        active: bool,
    ) -> Result<(), ExchangeError> {
        self.ensure_nominee(caller)?;
        if !self.params.assets.set_active(denom, active) {
            return Err(ExchangeError::UnknownAsset(denom.to_string()));
        }
        tracing::info!(caller, denom, active, "synthetic asset updated");
        Ok(())
    }

    /// End-of-block hook. The host calls this exactly once per block,
    /// strictly after every trade of the block has been applied.
    pub fn tick(&mut self, block: &Block) {
        for balance in self.markets.iter_mut() {
            if balance.tick(block.height, block.time) {
                tracing::info!(
                    denom = %balance.denom(),
                    height = block.height,
                    "market volume window flushed"
                );
            }
        }
    }

    fn ensure_nominee(&self, caller: &str) -> Result<(), ExchangeError> {
        if self.params.nominees.contains(caller) {
            Ok(())
        } else {
            Err(ExchangeError::Unauthorized(caller.to_string()))
        }
    }
}

/// A custody step failing after the up-front sufficiency check succeeded
/// means the preceding bookkeeping lied; there is nothing sane to roll
/// back to from inside the engine.
fn expect_custody(result: anyhow::Result<()>, op: &str) {
    if let Err(err) = result {
        panic!("token custody invariant violated during {op}: {err:#}");
    }
}
