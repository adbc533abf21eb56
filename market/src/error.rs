use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketError {
    #[error("amount must be positive")]
    InvalidAmount,

    #[error("amount too small to carry the fee")]
    AmountTooSmall,

    #[error("fee ratio out of range")]
    InvalidFeeRatio,

    #[error("arithmetic overflow")]
    Overflow,
}
