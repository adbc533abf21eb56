//! Imbalance & fee-curve calculator.
//!
//! The imbalance ratio is the proportional excess of one-sided trading
//! volume over the other within the effective (weighted + live) window:
//!
//! ```text
//! ratio = heavier / lighter - 1
//! ```
//!
//! The dynamic fee percentage follows a fitted exponential curve over the
//! ratio, truncated to whole percentage points before use.
//!
//! This computation is pure and deterministic given the effective volumes;
//! any I/O lives outside this module.

/// Direction of the prevailing trading skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    LongHeavy,
    ShortHeavy,
    #[default]
    Balanced,
}

/// Derived skew of recent trading volume. Recomputed on every live-volume
/// mutation; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imbalance {
    pub direction: Direction,
    pub ratio: f64,
}

impl Imbalance {
    pub fn balanced() -> Self {
        Self {
            direction: Direction::Balanced,
            ratio: 0.0,
        }
    }

    /// Derive the skew from effective weighted volumes.
    ///
    /// Either side at zero means there is no meaningful ratio yet and the
    /// market reads as balanced.
    pub fn from_effective(eff_long: u128, eff_short: u128) -> Self {
        if eff_long == 0 || eff_short == 0 || eff_long == eff_short {
            return Self::balanced();
        }

        if eff_long > eff_short {
            Self {
                direction: Direction::LongHeavy,
                ratio: eff_long as f64 / eff_short as f64 - 1.0,
            }
        } else {
            Self {
                direction: Direction::ShortHeavy,
                ratio: eff_short as f64 / eff_long as f64 - 1.0,
            }
        }
    }
}

impl Default for Imbalance {
    fn default() -> Self {
        Self::balanced()
    }
}

// Fitted so ratio 1.0 → ≈5% and ratio 0.5 → ≈1%.
const CURVE_INTERCEPT: f64 = -1.612_228_72;
const CURVE_SLOPE: f64 = 3.225_872_51;

/// Dynamic fee percentage for a skew ratio, truncated to whole percentage
/// points and clamped at 100 (a fee never exceeds the amount it is
/// charged on; the curve is only calibrated on ratios up to 1).
pub fn fee_percent(ratio: f64) -> u128 {
    let percent = (CURVE_INTERCEPT + CURVE_SLOPE * ratio).exp();
    percent.trunc().min(100.0) as u128
}

/// Dynamic fee on `amount` for a skew ratio. Zero ratio charges nothing.
pub fn fee_for_amount(amount: u128, ratio: f64) -> u128 {
    if ratio <= 0.0 {
        return 0;
    }
    let percent = fee_percent(ratio);
    match amount.checked_mul(percent) {
        Some(scaled) => scaled / 100,
        // percent <= 100, so the exact fee cannot exceed the amount.
        None => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sided_volume_reads_balanced() {
        assert_eq!(Imbalance::from_effective(0, 0), Imbalance::balanced());
        assert_eq!(Imbalance::from_effective(2000, 0), Imbalance::balanced());
        assert_eq!(Imbalance::from_effective(0, 2000), Imbalance::balanced());
        assert_eq!(Imbalance::from_effective(1500, 1500), Imbalance::balanced());
    }

    #[test]
    fn long_heavy_ratio() {
        let imb = Imbalance::from_effective(2000, 1000);
        assert_eq!(imb.direction, Direction::LongHeavy);
        assert!((imb.ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_heavy_ratio() {
        let imb = Imbalance::from_effective(1000, 1500);
        assert_eq!(imb.direction, Direction::ShortHeavy);
        assert!((imb.ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn curve_fixture_points() {
        // ratio 1.0 → exp(1.61364379) ≈ 5.02 → 5%
        assert_eq!(fee_for_amount(100, 1.0), 5);
        // ratio 0.5 → exp(0.00070756) ≈ 1.0007 → 1%
        assert_eq!(fee_for_amount(100, 0.5), 1);
    }

    #[test]
    fn zero_ratio_charges_nothing() {
        assert_eq!(fee_for_amount(1_000_000, 0.0), 0);
    }

    #[test]
    fn runaway_ratio_is_clamped_to_the_amount() {
        assert_eq!(fee_percent(1_000.0), 100);
        assert_eq!(fee_for_amount(400, 1_000.0), 400);
    }

    #[test]
    fn fee_floors_to_whole_units() {
        // 5% of 119 = 5.95 → 5.
        assert_eq!(fee_for_amount(119, 1.0), 5);
    }
}
