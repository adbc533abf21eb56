use market::error::MarketError;
use thiserror::Error;

/// Validation failures surfaced to the caller. All of these are detected
/// before any token movement; the host discards the attempted transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("invalid trade amount")]
    InvalidAmount,

    #[error("synthetic asset not enabled: {0}")]
    AssetNotEnabled(String),

    #[error("no oracle price for {0}")]
    NoOraclePrice(String),

    #[error("{account} holds less than {needed} {denom}")]
    InsufficientFunds {
        account: String,
        denom: String,
        needed: u128,
    },

    #[error("caller is not a nominee: {0}")]
    Unauthorized(String),

    #[error("synthetic asset already enabled: {0}")]
    DuplicateAsset(String),

    #[error("unknown synthetic asset: {0}")]
    UnknownAsset(String),

    #[error(transparent)]
    Market(#[from] MarketError),
}
