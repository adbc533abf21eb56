//! Flat protocol fee markup/markdown.
//!
//! The fee is a governance-supplied ratio with a minimum floor:
//! a buy pays `base * numerator / denominator` (at least `base + minimum`),
//! a sell receives the mirrored markdown. The markdown numerator is the
//! ratio reflected around the denominator (`2*denominator - numerator`),
//! so both sides charge the same raw delta
//! `floor(base * (numerator - denominator) / denominator)`.
//!
//! All arithmetic is checked; overflow is a typed error, never a wrap.

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// Raw governance parameters for the flat fee, as persisted/configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    pub numerator: u128,
    pub denominator: u128,
    pub minimum: u128,
}

/// Validated flat protocol fee. Immutable once constructed.
///
/// Invariant: `denominator < numerator < 2 * denominator`, so the markup
/// is strictly positive and the mirrored markdown numerator stays positive.
#[derive(Debug, Clone)]
pub struct FlatFee {
    numerator: u128,
    denominator: u128,
    minimum: u128,
}

impl FlatFee {
    pub fn new(numerator: u128, denominator: u128, minimum: u128) -> Result<Self, MarketError> {
        if denominator == 0 || numerator <= denominator {
            return Err(MarketError::InvalidFeeRatio);
        }
        let opposed = denominator
            .checked_mul(2)
            .ok_or(MarketError::Overflow)?;
        if numerator >= opposed {
            return Err(MarketError::InvalidFeeRatio);
        }
        Ok(Self {
            numerator,
            denominator,
            minimum,
        })
    }

    pub fn from_config(cfg: &FeeConfig) -> Result<Self, MarketError> {
        Self::new(cfg.numerator, cfg.denominator, cfg.minimum)
    }

    /// Fee actually charged on `base`: the raw ratio delta, floored at
    /// `minimum`.
    fn charged(&self, base: u128) -> Result<u128, MarketError> {
        let delta = base
            .checked_mul(self.numerator - self.denominator)
            .ok_or(MarketError::Overflow)?
            / self.denominator;
        Ok(delta.max(self.minimum))
    }

    /// Mark `base` up by the protocol fee.
    ///
    /// Guarantee: the result is at least `base + minimum`; the floor is
    /// always honored.
    pub fn add_to_amount(&self, base: u128) -> Result<u128, MarketError> {
        if base == 0 {
            return Err(MarketError::InvalidAmount);
        }
        let fee = self.charged(base)?;
        base.checked_add(fee).ok_or(MarketError::Overflow)
    }

    /// Mark `base` down by the protocol fee (mirrored markdown).
    ///
    /// Fails with `AmountTooSmall` when the fee consumes the whole base.
    pub fn sub_from_amount(&self, base: u128) -> Result<u128, MarketError> {
        if base == 0 {
            return Err(MarketError::InvalidAmount);
        }
        let fee = self.charged(base)?;
        match base.checked_sub(fee) {
            Some(reduced) if reduced > 0 => Ok(reduced),
            _ => Err(MarketError::AmountTooSmall),
        }
    }
}
