use crate::pool::FeeTier;
use alloy_primitives::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("State error - sqrtPrice is 0")]
    SqrtPriceIsZero,

    #[error("State error - liquidity is 0")]
    LiquidityIsZero,

    /// A token1 -> token0 input would push the price below zero, i.e. the
    /// trade is larger than the active range can absorb.
    #[error("State error - price underflow, input exceeds the active range")]
    PriceUnderflow,

    #[error("State error - next sqrtPrice is missing after simulation")]
    MissingPriceState,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),
}

/// Failures of a single read-only contract call. The payload is the
/// transport or decoder message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OnchainError {
    #[error("Onchain error - failed to get pool: {0}")]
    FailedToGetPool(String),
    #[error("Onchain error - failed to get liquidity: {0}")]
    FailedToGetLiquidity(String),
    #[error("Onchain error - failed to get slot0: {0}")]
    FailedToGetSlot0(String),
    #[error("Onchain error - failed to get token0: {0}")]
    FailedToGetToken0(String),
    #[error("Onchain error - failed to get decimals: {0}")]
    FailedToGetDecimals(String),
    #[error("Onchain error - failed to get symbol: {0}")]
    FailedToGetSymbol(String),
    #[error("Onchain error - failed to get logs: {0}")]
    FailedToGetLogs(String),
    #[error("Onchain error - failed to decode log: {0}")]
    FailedToDecodeLog(String),
    #[error("Onchain error - failed to get block number: {0}")]
    FailedToGetBlockNumber(String),
    #[error("Onchain error - failed to quote: {0}")]
    FailedToQuote(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriceFeedError {
    #[error("Price feed error - request failed: {0}")]
    Request(String),
    #[error("Price feed error - unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Price feed error - no USD price for {0}")]
    MissingPrice(String),
}

/// Request-level failures of a quote or a pool scan. Every variant is
/// terminal: no partial quote is produced.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("no viable pool found for token pair {token_a} / {token_b}")]
    NoViablePool { token_a: Address, token_b: Address },

    #[error("error checking pool for fee {fee}: {source}")]
    PoolQueryFailed {
        fee: FeeTier,
        #[source]
        source: OnchainError,
    },

    #[error("price underflow in pool {pool}: input exceeds the liquidity of the active range")]
    PriceUnderflow { pool: Address },

    #[error("sqrtPrice missing after simulating pool {pool}")]
    MissingPriceState { pool: Address },

    #[error("swap math failed for pool {pool}: {source}")]
    Math {
        pool: Address,
        #[source]
        source: Error,
    },

    #[error("chain read failed for {address}: {source}")]
    Chain {
        address: Address,
        #[source]
        source: OnchainError,
    },

    #[error("USD price lookup failed for {symbol}: {source}")]
    PriceFeed {
        symbol: String,
        #[source]
        source: PriceFeedError,
    },

    #[error("invalid input amount {0}: must be finite and non-negative")]
    InvalidAmount(f64),

    #[error("input amount {amount} with {decimals} decimals does not fit in a raw token amount")]
    AmountOutOfRange { amount: f64, decimals: u8 },
}

impl QuoteError {
    /// Attaches pool context to a math failure, lifting the two state
    /// errors that have their own request-level variant.
    pub fn from_math(pool: Address, err: Error) -> Self {
        match err {
            Error::StateError(StateError::PriceUnderflow) => Self::PriceUnderflow { pool },
            Error::StateError(StateError::MissingPriceState) => Self::MissingPriceState { pool },
            other => Self::Math {
                pool,
                source: other,
            },
        }
    }

    pub fn chain(address: Address, source: OnchainError) -> Self {
        Self::Chain { address, source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported fee tier {0}, expected one of 100, 500, 3000, 10000")]
    InvalidFeeTier(u32),
    #[error("config must list at least one fee tier")]
    NoFeeTiers,
    #[error("no factory address configured")]
    MissingFactory,
    #[error("no quoter address configured")]
    MissingQuoter,
}
