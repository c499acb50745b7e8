//! Exact-input quotes: pool selection, one consistent state read and the
//! single-range swap simulation.

use crate::error::QuoteError;
use crate::math::sqrt_price_math::sqrt_price_x96_to_price;
use crate::math::swap_math::{SwapInput, calculate_swap_output};
use crate::onchain::ChainReader;
use crate::pool::selector::select_best_pool;
use crate::pool::{FeeTier, PoolState, TokenMetadata};
use crate::price_feed::UsdPriceFeed;
use alloy_primitives::{Address, U160, U256};
use futures::try_join;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use tracing::{info, instrument};

/// Result of quoting `amount_in` of one token against the deepest pool of
/// the pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    /// Pre-trade price of the input token in units of the output token.
    pub spot_price: f64,
    pub amount_in: f64,
    pub pool_address: Address,
    pub usd_value: f64,
    pub fee: FeeTier,
    #[serde(serialize_with = "as_decimal")]
    pub sqrt_price_start: U256,
    #[serde(serialize_with = "as_decimal")]
    pub sqrt_price_next: U256,
    #[serde(serialize_with = "as_decimal")]
    pub liquidity: u128,
    pub decimals_in: u8,
    pub decimals_out: u8,
    pub zero_for_one: bool,
    /// Output after decimal normalization.
    #[serde(serialize_with = "as_decimal")]
    pub amount_out: U256,
    #[serde(serialize_with = "as_decimal")]
    pub amount_in_raw: U256,
    #[serde(serialize_with = "as_decimal")]
    pub fee_amount: U256,
    pub symbol_in: String,
}

fn as_decimal<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Rejects amounts a token balance cannot represent.
fn validate_amount(amount: f64) -> Result<(), QuoteError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(QuoteError::InvalidAmount(amount));
    }
    Ok(())
}

/// `floor(amount * 10^decimals)` as a raw token amount.
pub fn to_raw_amount(amount: f64, decimals: u8) -> Result<U256, QuoteError> {
    validate_amount(amount)?;

    let scaled = (amount * 10f64.powi(i32::from(decimals))).floor();
    if !scaled.is_finite() || scaled >= u128::MAX as f64 {
        return Err(QuoteError::AmountOutOfRange { amount, decimals });
    }

    Ok(U256::from(scaled as u128))
}

/// Quotes swaps against the pools of one factory.
///
/// Holds no pool state: every quote re-reads the chain, so a shared
/// `Quoter` can serve concurrent requests.
pub struct Quoter<R, F> {
    reader: R,
    feed: F,
    factory: Address,
    fee_tiers: Vec<FeeTier>,
}

impl<R, F> Quoter<R, F>
where
    R: ChainReader,
    F: UsdPriceFeed,
{
    pub fn new(reader: R, feed: F, factory: Address) -> Self {
        Self {
            reader,
            feed,
            factory,
            fee_tiers: FeeTier::ALL.to_vec(),
        }
    }

    /// Restricts pool selection to `fee_tiers`, queried in the given order.
    pub fn with_fee_tiers(mut self, fee_tiers: Vec<FeeTier>) -> Self {
        self.fee_tiers = fee_tiers;
        self
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub async fn get_amount_out(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: f64,
    ) -> Result<SwapQuote, QuoteError> {
        self.get_amount_out_with_factory(token_in, token_out, amount_in, self.factory)
            .await
    }

    /// Quotes `amount_in` whole units of `token_in` for `token_out` using the
    /// pools of `factory`.
    ///
    /// The swap is simulated inside the active liquidity range of the pool
    /// with the most liquidity. Any failing read or math step aborts the
    /// quote.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_amount_out_with_factory(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: f64,
        factory: Address,
    ) -> Result<SwapQuote, QuoteError> {
        validate_amount(amount_in)?;

        let ranked =
            select_best_pool(&self.reader, factory, token_in, token_out, &self.fee_tiers).await?;
        let pool = ranked.pool.address;

        let (slot0, token0) = try_join!(
            async { self.reader.slot0(pool).await.map_err(|e| QuoteError::chain(pool, e)) },
            async { self.reader.token0(pool).await.map_err(|e| QuoteError::chain(pool, e)) },
        )?;

        let (decimals_in, decimals_out, symbol_in) = try_join!(
            async {
                self.reader
                    .decimals(token_in)
                    .await
                    .map_err(|e| QuoteError::chain(token_in, e))
            },
            async {
                self.reader
                    .decimals(token_out)
                    .await
                    .map_err(|e| QuoteError::chain(token_out, e))
            },
            async {
                self.reader
                    .symbol(token_in)
                    .await
                    .map_err(|e| QuoteError::chain(token_in, e))
            },
        )?;

        let input_token = TokenMetadata {
            decimals: decimals_in,
            symbol: symbol_in,
        };
        let state = PoolState::new(slot0, ranked.liquidity);
        let amount_in_raw = to_raw_amount(amount_in, input_token.decimals)?;
        let zero_for_one = token_in == token0;

        let output = calculate_swap_output(&SwapInput {
            amount_in_raw,
            sqrt_price_x96: state.sqrt_price_x96,
            liquidity: state.liquidity,
            fee_bps: ranked.pool.fee.value(),
            zero_for_one,
            decimals_in,
            decimals_out,
        })
        .map_err(|e| QuoteError::from_math(pool, e))?;

        let (decimals0, decimals1) = if zero_for_one {
            (decimals_in, decimals_out)
        } else {
            (decimals_out, decimals_in)
        };
        let spot_price =
            sqrt_price_x96_to_price(state.sqrt_price_x96, decimals0, decimals1, zero_for_one);

        let usd_price = self
            .feed
            .get_usd_price(&input_token.symbol)
            .await
            .map_err(|source| QuoteError::PriceFeed {
                symbol: input_token.symbol.clone(),
                source,
            })?;

        info!(
            %pool,
            fee = %ranked.pool.fee,
            zero_for_one,
            amount_out = %output.amount_out,
            spot_price,
            "quote complete"
        );

        Ok(SwapQuote {
            spot_price,
            amount_in,
            pool_address: pool,
            usd_value: usd_price * amount_in,
            fee: ranked.pool.fee,
            sqrt_price_start: state.sqrt_price_x96,
            sqrt_price_next: output.sqrt_price_next,
            liquidity: state.liquidity,
            decimals_in,
            decimals_out,
            zero_for_one,
            amount_out: output.amount_out,
            amount_in_raw,
            fee_amount: output.fee_amount,
            symbol_in: input_token.symbol,
        })
    }

    /// Asks the periphery quoter contract at `quoter` for the raw output of
    /// `amount_in` whole units of `token_in` in the `fee` pool.
    ///
    /// Unlike [`Quoter::get_amount_out`] the contract crosses ticks, so this
    /// is the reference value for large trades.
    #[instrument(skip(self), level = "debug")]
    pub async fn onchain_amount_out(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        fee: FeeTier,
        amount_in: f64,
    ) -> Result<U256, QuoteError> {
        validate_amount(amount_in)?;

        let decimals_in = self
            .reader
            .decimals(token_in)
            .await
            .map_err(|e| QuoteError::chain(token_in, e))?;
        let amount_in_raw = to_raw_amount(amount_in, decimals_in)?;

        let amount_out = self
            .reader
            .quote_exact_input_single(quoter, token_in, token_out, fee, amount_in_raw, U160::ZERO)
            .await
            .map_err(|e| QuoteError::chain(quoter, e))?;

        info!(%quoter, %fee, %amount_in_raw, %amount_out, "onchain quote complete");
        Ok(amount_out)
    }
}
