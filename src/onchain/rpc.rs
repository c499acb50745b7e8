use super::{
    ChainReader, DEFAULT_LOG_CHUNK_SIZE, DEFAULT_LOG_CONCURRENCY, LogSource, PoolCreatedEvent,
};
use crate::error::OnchainError;
use crate::pool::{FeeTier, Slot0};
use alloy_primitives::aliases::U24;
use alloy_primitives::{Address, BlockNumber, U160, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::Filter;
use alloy_sol_macro::sol;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, instrument};

sol! {
    #[sol(rpc)]
    interface IUniswapV3Factory {
        event PoolCreated(
            address indexed token0,
            address indexed token1,
            uint24 indexed fee,
            int24 tickSpacing,
            address pool
        );
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }
}

sol! {
    #[sol(rpc)]
    interface IV3Pool {
        function token0() external view returns (address);
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
        function liquidity() external view returns (uint128);
    }
}

sol! {
    #[sol(rpc)]
    interface IQuoter {
        function quoteExactInputSingle(
            address tokenIn,
            address tokenOut,
            uint24 fee,
            uint256 amountIn,
            uint160 sqrtPriceLimitX96
        ) external view returns (uint256 amountOut);
    }
}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

pub type OnchainProvider<P> = Arc<P>;

/// [`ChainReader`] backed by JSON-RPC `eth_call`s at the latest block.
#[derive(Debug)]
pub struct RpcChainReader<P> {
    provider: OnchainProvider<P>,
}

impl<P> Clone for RpcChainReader<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P> RpcChainReader<P> {
    pub fn new(provider: OnchainProvider<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> ChainReader for RpcChainReader<P>
where
    P: Provider + 'static,
{
    async fn get_pool(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> Result<Address, OnchainError> {
        let contract =
            IUniswapV3Factory::IUniswapV3FactoryInstance::new(factory, self.provider.clone());

        contract
            .getPool(token_a, token_b, U24::from(fee.value()))
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetPool(e.to_string()))
    }

    async fn liquidity(&self, pool: Address) -> Result<u128, OnchainError> {
        let contract = IV3Pool::IV3PoolInstance::new(pool, self.provider.clone());

        contract
            .liquidity()
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetLiquidity(e.to_string()))
    }

    async fn slot0(&self, pool: Address) -> Result<Slot0, OnchainError> {
        let contract = IV3Pool::IV3PoolInstance::new(pool, self.provider.clone());

        let slot0 = contract
            .slot0()
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetSlot0(e.to_string()))?;

        Ok(Slot0 {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
        })
    }

    async fn token0(&self, pool: Address) -> Result<Address, OnchainError> {
        let contract = IV3Pool::IV3PoolInstance::new(pool, self.provider.clone());

        contract
            .token0()
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetToken0(e.to_string()))
    }

    async fn decimals(&self, token: Address) -> Result<u8, OnchainError> {
        let contract = IERC20::IERC20Instance::new(token, self.provider.clone());

        contract
            .decimals()
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetDecimals(e.to_string()))
    }

    async fn symbol(&self, token: Address) -> Result<String, OnchainError> {
        let contract = IERC20::IERC20Instance::new(token, self.provider.clone());

        contract
            .symbol()
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetSymbol(e.to_string()))
    }

    async fn quote_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        amount_in: U256,
        sqrt_price_limit_x96: U160,
    ) -> Result<U256, OnchainError> {
        let contract = IQuoter::IQuoterInstance::new(quoter, self.provider.clone());

        contract
            .quoteExactInputSingle(
                token_in,
                token_out,
                U24::from(fee.value()),
                amount_in,
                sqrt_price_limit_x96,
            )
            .call()
            .await
            .map_err(|e| OnchainError::FailedToQuote(e.to_string()))
    }
}

/// [`LogSource`] backed by `eth_getLogs`, splitting the block range into
/// `chunk_size` windows. At most `concurrency` windows are requested at a
/// time and results are reassembled in block order.
#[derive(Debug)]
pub struct RpcLogSource<P> {
    provider: OnchainProvider<P>,
    chunk_size: u64,
    concurrency: usize,
}

impl<P> RpcLogSource<P> {
    pub fn new(provider: OnchainProvider<P>) -> Self {
        Self::with_chunk_size(provider, DEFAULT_LOG_CHUNK_SIZE)
    }

    pub fn with_chunk_size(provider: OnchainProvider<P>, chunk_size: u64) -> Self {
        Self {
            provider,
            chunk_size: chunk_size.max(1),
            concurrency: DEFAULT_LOG_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Splits `[from_block, to_block]` into inclusive windows of at most
/// `chunk_size` blocks.
pub(crate) fn block_windows(
    from_block: BlockNumber,
    to_block: BlockNumber,
    chunk_size: u64,
) -> Vec<(BlockNumber, BlockNumber)> {
    let mut windows = Vec::new();
    let mut start = from_block;

    while start <= to_block {
        let end = start.saturating_add(chunk_size - 1).min(to_block);
        windows.push((start, end));
        if end == BlockNumber::MAX {
            break;
        }
        start = end + 1;
    }

    windows
}

#[async_trait]
impl<P> LogSource for RpcLogSource<P>
where
    P: Provider + 'static,
{
    #[instrument(skip(self), level = "debug")]
    async fn pool_created_events(
        &self,
        factory: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<PoolCreatedEvent>, OnchainError> {
        let windows: Vec<_> = block_windows(from_block, to_block, self.chunk_size)
            .into_iter()
            .map(|(start, end)| {
                let provider = self.provider.clone();
                let filter = Filter::new()
                    .address(factory)
                    .event_signature(IUniswapV3Factory::PoolCreated::SIGNATURE_HASH)
                    .from_block(start)
                    .to_block(end);

                async move { provider.get_logs(&filter).await }
            })
            .collect();

        let mut requests = stream::iter(windows).buffered(self.concurrency);

        let mut events = Vec::new();
        while let Some(result) = requests.next().await {
            let logs = result.map_err(|e| OnchainError::FailedToGetLogs(e.to_string()))?;
            debug!(count = logs.len(), "fetched PoolCreated logs");

            for log in logs {
                let decoded = IUniswapV3Factory::PoolCreated::decode_log(&log.inner)
                    .map_err(|e| OnchainError::FailedToDecodeLog(e.to_string()))?;

                events.push(PoolCreatedEvent {
                    token0: decoded.data.token0,
                    token1: decoded.data.token1,
                    fee: decoded.data.fee.to::<u32>(),
                    tick_spacing: decoded.data.tickSpacing.as_i32(),
                    pool: decoded.data.pool,
                    block_number: log.block_number,
                });
            }
        }

        Ok(events)
    }

    async fn latest_block(&self) -> Result<BlockNumber, OnchainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| OnchainError::FailedToGetBlockNumber(e.to_string()))
    }
}
