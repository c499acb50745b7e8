use crate::error::QuoteError;
use crate::onchain::{LogSource, PoolCreatedEvent};
use crate::pool::{FeeTier, sort_tokens};
use alloy_primitives::{Address, BlockNumber};
use serde::Serialize;
use tracing::{debug, info};

/// A pool as announced by the factory's `PoolCreated` event.
///
/// `fee` is the raw fee amount of the event. Factories can enable amounts
/// beyond the standard tiers, so it is not narrowed to [`FeeTier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
}

impl PoolRecord {
    /// The standard tier this pool belongs to, if any.
    pub fn fee_tier(&self) -> Option<FeeTier> {
        FeeTier::try_from(self.fee).ok()
    }
}

impl From<PoolCreatedEvent> for PoolRecord {
    fn from(event: PoolCreatedEvent) -> Self {
        let (token0, token1) = sort_tokens(event.token0, event.token1);
        Self {
            address: event.pool,
            token0,
            token1,
            fee: event.fee,
        }
    }
}

/// Lists every pool `factory` created in `[from_block, to_block]`.
///
/// `to_block = None` scans up to the source's latest block. The result is
/// fully materialized before returning, one record per event.
pub async fn list_pools<S>(
    source: &S,
    factory: Address,
    from_block: BlockNumber,
    to_block: Option<BlockNumber>,
) -> Result<Vec<PoolRecord>, QuoteError>
where
    S: LogSource + ?Sized,
{
    let to_block = match to_block {
        Some(block) => block,
        None => source
            .latest_block()
            .await
            .map_err(|e| QuoteError::chain(factory, e))?,
    };

    let events = source
        .pool_created_events(factory, from_block, to_block)
        .await
        .map_err(|e| QuoteError::chain(factory, e))?;

    let pools: Vec<PoolRecord> = events
        .into_iter()
        .map(PoolRecord::from)
        .inspect(|pool| {
            if pool.fee_tier().is_none() {
                debug!(pool = %pool.address, fee = pool.fee, "pool uses a non-standard fee amount");
            }
        })
        .collect();

    info!(%factory, from_block, to_block, count = pools.len(), "listed pools");

    Ok(pools)
}
