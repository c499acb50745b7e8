//! Deterministic in-memory implementations of the collaborator traits.
//!
//! Used by the unit and integration tests to drive pool selection, quoting
//! and discovery without a node or a price API.

use crate::FastMap;
use crate::error::{OnchainError, PriceFeedError};
use crate::onchain::{ChainReader, LogSource, PoolCreatedEvent};
use crate::pool::{FeeTier, Slot0, sort_tokens};
use crate::price_feed::UsdPriceFeed;
use alloy_primitives::{Address, BlockNumber, U160, U256};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

type PoolKey = (Address, Address, Address, FeeTier);

#[derive(Default)]
struct ChainState {
    pools: FastMap<PoolKey, Address>,
    token0: FastMap<Address, Address>,
    liquidity: FastMap<Address, u128>,
    slot0: FastMap<Address, Slot0>,
    decimals: FastMap<Address, u8>,
    symbols: FastMap<Address, String>,
    quotes: FastMap<(Address, Address, FeeTier), U256>,
    get_pool_failures: FastMap<FeeTier, String>,
    call_failures: FastMap<(&'static str, Address), String>,
}

/// In-memory [`ChainReader`]. State can be replaced between calls through
/// the `set_*` methods; every read counts towards [`MockChain::reads`].
#[derive(Default)]
pub struct MockChain {
    state: RwLock<ChainState>,
    reads: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pool for `factory` and the unordered pair, with token0
    /// set to the lower address.
    pub fn with_pool(
        self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
        pool: Address,
        liquidity: u128,
    ) -> Self {
        {
            let mut state = self.state.write();
            let (token0, token1) = sort_tokens(token_a, token_b);
            state.pools.insert((factory, token0, token1, fee), pool);
            state.token0.insert(pool, token0);
            state.liquidity.insert(pool, liquidity);
        }
        self
    }

    pub fn with_slot0(self, pool: Address, slot0: Slot0) -> Self {
        self.set_slot0(pool, slot0);
        self
    }

    pub fn with_token(self, token: Address, decimals: u8, symbol: &str) -> Self {
        {
            let mut state = self.state.write();
            state.decimals.insert(token, decimals);
            state.symbols.insert(token, symbol.to_string());
        }
        self
    }

    /// Answer of the quoter contract for `token_in -> token_out` at `fee`,
    /// whatever the input amount.
    pub fn with_onchain_quote(
        self,
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        amount_out: U256,
    ) -> Self {
        self.state
            .write()
            .quotes
            .insert((token_in, token_out, fee), amount_out);
        self
    }

    /// Makes `getPool` fail for every pair at `fee`.
    pub fn failing_get_pool(self, fee: FeeTier, msg: &str) -> Self {
        self.state
            .write()
            .get_pool_failures
            .insert(fee, msg.to_string());
        self
    }

    pub fn failing_liquidity(self, pool: Address, msg: &str) -> Self {
        self.fail_call("liquidity", pool, msg)
    }

    pub fn failing_slot0(self, pool: Address, msg: &str) -> Self {
        self.fail_call("slot0", pool, msg)
    }

    pub fn failing_token0(self, pool: Address, msg: &str) -> Self {
        self.fail_call("token0", pool, msg)
    }

    pub fn failing_decimals(self, token: Address, msg: &str) -> Self {
        self.fail_call("decimals", token, msg)
    }

    pub fn failing_symbol(self, token: Address, msg: &str) -> Self {
        self.fail_call("symbol", token, msg)
    }

    fn fail_call(self, call: &'static str, address: Address, msg: &str) -> Self {
        self.state
            .write()
            .call_failures
            .insert((call, address), msg.to_string());
        self
    }

    pub fn set_slot0(&self, pool: Address, slot0: Slot0) {
        self.state.write().slot0.insert(pool, slot0);
    }

    /// Total number of contract reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read<T: Clone>(
        &self,
        call: &'static str,
        address: Address,
        lookup: impl FnOnce(&ChainState) -> Option<T>,
        err: fn(String) -> OnchainError,
    ) -> Result<T, OnchainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read();

        if let Some(msg) = state.call_failures.get(&(call, address)) {
            return Err(err(msg.clone()));
        }

        lookup(&state).ok_or_else(|| err(format!("execution reverted: no {call} for {address}")))
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn get_pool(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
    ) -> Result<Address, OnchainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read();

        if let Some(msg) = state.get_pool_failures.get(&fee) {
            return Err(OnchainError::FailedToGetPool(msg.clone()));
        }

        let (token0, token1) = sort_tokens(token_a, token_b);
        Ok(state
            .pools
            .get(&(factory, token0, token1, fee))
            .copied()
            .unwrap_or(Address::ZERO))
    }

    async fn liquidity(&self, pool: Address) -> Result<u128, OnchainError> {
        self.read(
            "liquidity",
            pool,
            |s| s.liquidity.get(&pool).copied(),
            OnchainError::FailedToGetLiquidity,
        )
    }

    async fn slot0(&self, pool: Address) -> Result<Slot0, OnchainError> {
        self.read(
            "slot0",
            pool,
            |s| s.slot0.get(&pool).copied(),
            OnchainError::FailedToGetSlot0,
        )
    }

    async fn token0(&self, pool: Address) -> Result<Address, OnchainError> {
        self.read(
            "token0",
            pool,
            |s| s.token0.get(&pool).copied(),
            OnchainError::FailedToGetToken0,
        )
    }

    async fn decimals(&self, token: Address) -> Result<u8, OnchainError> {
        self.read(
            "decimals",
            token,
            |s| s.decimals.get(&token).copied(),
            OnchainError::FailedToGetDecimals,
        )
    }

    async fn symbol(&self, token: Address) -> Result<String, OnchainError> {
        self.read(
            "symbol",
            token,
            |s| s.symbols.get(&token).cloned(),
            OnchainError::FailedToGetSymbol,
        )
    }

    async fn quote_exact_input_single(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        _amount_in: U256,
        _sqrt_price_limit_x96: U160,
    ) -> Result<U256, OnchainError> {
        self.read(
            "quoteExactInputSingle",
            quoter,
            |s| s.quotes.get(&(token_in, token_out, fee)).copied(),
            OnchainError::FailedToQuote,
        )
    }
}

/// In-memory [`LogSource`] holding a fixed list of `PoolCreated` events.
pub struct MockLogSource {
    latest_block: BlockNumber,
    events: Vec<PoolCreatedEvent>,
    failure: Option<String>,
}

impl MockLogSource {
    pub fn new(latest_block: BlockNumber) -> Self {
        Self {
            latest_block,
            events: Vec::new(),
            failure: None,
        }
    }

    pub fn with_event(mut self, event: PoolCreatedEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn failing(mut self, msg: &str) -> Self {
        self.failure = Some(msg.to_string());
        self
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn pool_created_events(
        &self,
        _factory: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<PoolCreatedEvent>, OnchainError> {
        if let Some(msg) = &self.failure {
            return Err(OnchainError::FailedToGetLogs(msg.clone()));
        }

        Ok(self
            .events
            .iter()
            .filter(|e| {
                e.block_number
                    .is_some_and(|b| (from_block..=to_block).contains(&b))
            })
            .cloned()
            .collect())
    }

    async fn latest_block(&self) -> Result<BlockNumber, OnchainError> {
        Ok(self.latest_block)
    }
}

/// Fixed-price [`UsdPriceFeed`].
#[derive(Default)]
pub struct MockPriceFeed {
    prices: FastMap<String, f64>,
    failures: FastMap<String, String>,
}

impl MockPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn failing(mut self, symbol: &str, msg: &str) -> Self {
        self.failures.insert(symbol.to_string(), msg.to_string());
        self
    }
}

#[async_trait]
impl UsdPriceFeed for MockPriceFeed {
    async fn get_usd_price(&self, symbol: &str) -> Result<f64, PriceFeedError> {
        if let Some(msg) = self.failures.get(symbol) {
            return Err(PriceFeedError::Request(msg.clone()));
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceFeedError::MissingPrice(symbol.to_string()))
    }
}
