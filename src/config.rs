//! File-backed settings for the quoter and the pool scanner.

use crate::error::ConfigError;
use crate::onchain::{DEFAULT_LOG_CHUNK_SIZE, DEFAULT_LOG_CONCURRENCY};
use crate::pool::FeeTier;
use crate::price_feed::DEFAULT_PRICE_FEED_URL;
use alloy_primitives::{Address, BlockNumber};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Endpoint used when neither the file nor `--rpc-url` names one.
pub const DEFAULT_RPC_URL: &str = "https://evmrpc-testnet.0g.ai";

/// Deployment block of the default factory; earlier blocks hold no
/// `PoolCreated` events.
pub const DEFAULT_DISCOVERY_START_BLOCK: BlockNumber = 171_522;

/// Every field is optional in the file and falls back to its default.
///
/// ```toml
/// rpc_url = "https://evmrpc-testnet.0g.ai"
/// factory_address = "0x1f98431c8ad98523631ae4a59f267346ea31f984"
/// fee_tiers = [500, 3000]
/// discovery_start_block = 171522
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuoteConfig {
    pub rpc_url: String,
    pub factory_address: Option<Address>,
    /// Periphery quoter used by `onchain-quote`.
    pub quoter_address: Option<Address>,
    pub fee_tiers: Vec<FeeTier>,
    pub discovery_start_block: BlockNumber,
    pub price_feed_url: String,
    pub log_chunk_size: u64,
    pub log_concurrency: usize,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            factory_address: None,
            quoter_address: None,
            fee_tiers: FeeTier::ALL.to_vec(),
            discovery_start_block: DEFAULT_DISCOVERY_START_BLOCK,
            price_feed_url: DEFAULT_PRICE_FEED_URL.to_string(),
            log_chunk_size: DEFAULT_LOG_CHUNK_SIZE,
            log_concurrency: DEFAULT_LOG_CONCURRENCY,
        }
    }
}

impl QuoteConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_tiers.is_empty() {
            return Err(ConfigError::NoFeeTiers);
        }
        Ok(())
    }

    pub fn factory(&self) -> Result<Address, ConfigError> {
        self.factory_address.ok_or(ConfigError::MissingFactory)
    }

    pub fn quoter(&self) -> Result<Address, ConfigError> {
        self.quoter_address.ok_or(ConfigError::MissingQuoter)
    }
}
