//! Swap quotes against Uniswap V3-style concentrated-liquidity pools.
//!
//! A quote picks the deepest pool of a token pair across the standard fee
//! tiers, reads its price state once, and simulates an exact-input swap
//! inside the active liquidity range with exact 256/512-bit integer math.
//!
//! - [`math`]: sqrt-price conversions and the single-range swap step.
//! - [`pool`]: fee tiers, pool selection and `PoolCreated` discovery.
//! - [`quote`]: the [`Quoter`] tying selection, state reads and math together.
//! - [`onchain`] / [`price_feed`]: collaborator traits with alloy and HTTP
//!   backed implementations (features `onchain` and `http-feed`).
//! - [`mock`]: deterministic in-memory collaborators.
//!
//! # Examples
//!
//! ## Pure math
//! ```
//! use clmm_quote::{Q96, U256, math::swap_math::{SwapInput, calculate_swap_output}};
//!
//! let out = calculate_swap_output(&SwapInput {
//!     amount_in_raw: U256::from(1_000_000u64),
//!     sqrt_price_x96: Q96,
//!     liquidity: 1_000_000_000_000_000_000,
//!     fee_bps: 3000,
//!     zero_for_one: true,
//!     decimals_in: 18,
//!     decimals_out: 18,
//! })
//! .unwrap();
//!
//! assert_eq!(out.fee_amount, U256::from(300_000u64));
//! assert!(out.sqrt_price_next > Q96);
//! ```
//!
//! ## Quoting over RPC
//! ```no_run
//! # #[cfg(all(feature = "onchain", feature = "http-feed"))]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use alloy_provider::ProviderBuilder;
//! use clmm_quote::{Quoter, address, onchain::RpcChainReader, price_feed::CryptoCompareFeed};
//! use std::sync::Arc;
//!
//! let provider = ProviderBuilder::new().connect_http("https://evmrpc-testnet.0g.ai".parse()?);
//! let quoter = Quoter::new(
//!     RpcChainReader::new(Arc::new(provider)),
//!     CryptoCompareFeed::default(),
//!     address!("0x1f98431c8ad98523631ae4a59f267346ea31f984"),
//! );
//!
//! let quote = quoter
//!     .get_amount_out(
//!         address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
//!         address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
//!         1.5,
//!     )
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&quote)?);
//! # Ok(())
//! # }
//! ```

pub use alloy_primitives::{Address, U256, address};

pub mod config;
pub mod error;
mod hash;
pub mod math;
pub mod mock;
pub mod onchain;
pub mod pool;
pub mod price_feed;
pub mod quote;

pub use config::QuoteConfig;
pub use hash::FastMap;
pub use pool::{FeeTier, Pool};
pub use quote::{Quoter, SwapQuote};

pub(crate) const U256_E4: U256 = U256::from_limbs([10000, 0, 0, 0]);

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
