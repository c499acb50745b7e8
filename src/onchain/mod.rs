//! Read-only chain access the quote path depends on.
//!
//! [`ChainReader`] and [`LogSource`] are the seams between the pure math and
//! the network. `RpcChainReader` / `RpcLogSource` (feature `onchain`) back them
//! with an alloy provider; [`crate::mock`] provides in-memory doubles.

#[cfg(feature = "onchain")]
mod rpc;

#[cfg(feature = "onchain")]
pub use rpc::{IERC20, IQuoter, IUniswapV3Factory, IV3Pool, RpcChainReader, RpcLogSource};

use crate::error::OnchainError;
use crate::pool::{FeeTier, Slot0};
use alloy_primitives::{Address, BlockNumber, U160, U256};
use async_trait::async_trait;

/// Block span of a single `eth_getLogs` request. Public RPC endpoints
/// commonly reject wider ranges.
pub const DEFAULT_LOG_CHUNK_SIZE: u64 = 10_000;

/// Upper bound on `eth_getLogs` requests in flight during one scan.
pub const DEFAULT_LOG_CONCURRENCY: usize = 4;

/// Contract reads needed to rank pools and price a swap.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `factory.getPool(token_a, token_b, fee)`. `Address::ZERO` means no
    /// pool exists for that key.
    async fn get_pool(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> Result<Address, OnchainError>;

    async fn liquidity(&self, pool: Address) -> Result<u128, OnchainError>;

    async fn slot0(&self, pool: Address) -> Result<Slot0, OnchainError>;

    async fn token0(&self, pool: Address) -> Result<Address, OnchainError>;

    async fn decimals(&self, token: Address) -> Result<u8, OnchainError>;

    async fn symbol(&self, token: Address) -> Result<String, OnchainError>;

    /// `quoter.quoteExactInputSingle(...)`: the periphery quoter's output for
    /// `amount_in` raw units, simulated across ticks by the contract itself.
    /// A zero `sqrt_price_limit_x96` means no limit.
    async fn quote_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        amount_in: U256,
        sqrt_price_limit_x96: U160,
    ) -> Result<U256, OnchainError>;
}

/// A decoded `PoolCreated(token0, token1, fee, tickSpacing, pool)` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolCreatedEvent {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_spacing: i32,
    pub pool: Address,
    pub block_number: Option<BlockNumber>,
}

/// Historical factory event access.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// All `PoolCreated` events emitted by `factory` in `[from_block, to_block]`.
    async fn pool_created_events(
        &self,
        factory: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<PoolCreatedEvent>, OnchainError>;

    async fn latest_block(&self) -> Result<BlockNumber, OnchainError>;
}
