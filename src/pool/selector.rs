use crate::error::QuoteError;
use crate::onchain::ChainReader;
use crate::pool::{FeeTier, Pool, RankedPool};
use alloy_primitives::Address;
use tracing::{debug, info};

/// Finds the pool with the most in-range liquidity for a token pair.
///
/// Fee tiers are queried in the order given. A tier without a deployed pool
/// (`getPool` returns the zero address) is skipped; a tier whose liquidity
/// is zero is never selected. On equal liquidity the earlier tier wins.
///
/// Any failing read aborts the scan with [`QuoteError::PoolQueryFailed`]
/// naming the tier: a transport error is never mistaken for "no pool".
pub async fn select_best_pool<R>(
    reader: &R,
    factory: Address,
    token_a: Address,
    token_b: Address,
    fee_tiers: &[FeeTier],
) -> Result<RankedPool, QuoteError>
where
    R: ChainReader + ?Sized,
{
    let mut best: Option<RankedPool> = None;

    for &fee in fee_tiers {
        let pool_address = reader
            .get_pool(factory, token_a, token_b, fee)
            .await
            .map_err(|source| QuoteError::PoolQueryFailed { fee, source })?;

        if pool_address == Address::ZERO {
            debug!(%fee, "no pool deployed for fee tier");
            continue;
        }

        let liquidity = reader
            .liquidity(pool_address)
            .await
            .map_err(|source| QuoteError::PoolQueryFailed { fee, source })?;

        debug!(%fee, pool = %pool_address, liquidity, "queried fee tier");

        let is_better = match &best {
            Some(current) => liquidity > current.liquidity,
            None => liquidity > 0,
        };

        if is_better {
            best = Some(RankedPool {
                pool: Pool::new(pool_address, token_a, token_b, fee),
                liquidity,
            });
        }
    }

    let best = best.ok_or(QuoteError::NoViablePool { token_a, token_b })?;

    info!(
        pool = %best.pool.address,
        fee = %best.pool.fee,
        liquidity = best.liquidity,
        "selected pool"
    );

    Ok(best)
}
