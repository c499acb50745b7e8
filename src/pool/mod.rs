pub mod fee_tier;
pub mod registry;
pub mod selector;

pub use fee_tier::FeeTier;

use alloy_primitives::{Address, U160, U256};
use serde::Serialize;

/// Converts an `Address` into its `U160` numeric representation.
///
/// This is mainly used to compare or sort addresses by value.
#[inline(always)]
pub fn address_to_u160(address: Address) -> U160 {
    address.into()
}

/// Returns the token pair sorted by numeric address, the ordering the
/// factory uses to assign `token0` and `token1`.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if address_to_u160(token_a) < address_to_u160(token_b) {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

/// A pool identified by its factory key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: FeeTier,
}

impl Pool {
    /// Builds a pool record, sorting the tokens into canonical order.
    pub fn new(address: Address, token_a: Address, token_b: Address, fee: FeeTier) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        Self {
            address,
            token0,
            token1,
            fee,
        }
    }
}

/// A pool together with the in-range liquidity it was ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedPool {
    pub pool: Pool,
    pub liquidity: u128,
}

/// The `slot0` fields the quote path reads.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Point-in-time price state of one pool, read once per quote.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick: i32,
}

impl PoolState {
    pub fn new(slot0: Slot0, liquidity: u128) -> Self {
        Self {
            sqrt_price_x96: slot0.sqrt_price_x96,
            liquidity,
            tick: slot0.tick,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub decimals: u8,
    pub symbol: String,
}
