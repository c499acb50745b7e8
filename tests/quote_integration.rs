use clmm_quote::error::QuoteError;
use clmm_quote::math::swap_math::{SwapInput, calculate_swap_output};
use clmm_quote::mock::{MockChain, MockLogSource, MockPriceFeed};
use clmm_quote::onchain::PoolCreatedEvent;
use clmm_quote::pool::Slot0;
use clmm_quote::pool::registry::list_pools;
use clmm_quote::{Address, FeeTier, Quoter, U256, address};
use futures::future::join_all;
use std::str::FromStr;
use std::sync::Arc;

const FACTORY: Address = address!("0x1f98431c8ad98523631ae4a59f267346ea31f984");
const USDC: Address = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
const WETH: Address = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
const POOL_500: Address = address!("0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640");
const POOL_3000: Address = address!("0x8ad599c3a0ff1de082011efddc58f1908eb6e6d8");

const LIQUIDITY_500: u128 = 1_517_882_343_751_509_868_544;
const LIQUIDITY_3000: u128 = 36_030_947_065_620_870_000;

fn sqrt_price() -> U256 {
    U256::from_str("1456928274067706885522396459869524").unwrap()
}

fn mainnet_like_chain() -> MockChain {
    let slot0 = Slot0 {
        sqrt_price_x96: sqrt_price(),
        tick: 198_800,
    };

    MockChain::new()
        .with_pool(FACTORY, USDC, WETH, FeeTier::Low, POOL_500, LIQUIDITY_500)
        .with_pool(FACTORY, USDC, WETH, FeeTier::Medium, POOL_3000, LIQUIDITY_3000)
        .with_slot0(POOL_500, slot0)
        .with_slot0(POOL_3000, slot0)
        .with_token(USDC, 6, "USDC")
        .with_token(WETH, 18, "WETH")
}

fn feed() -> MockPriceFeed {
    MockPriceFeed::new()
        .with_price("USDC", 1.0)
        .with_price("WETH", 2957.0)
}

#[tokio::test]
async fn quotes_usdc_for_weth_on_deepest_pool() {
    let quoter = Quoter::new(mainnet_like_chain(), feed(), FACTORY);

    let quote = quoter.get_amount_out(USDC, WETH, 1000.0).await.unwrap();

    let expected = calculate_swap_output(&SwapInput {
        amount_in_raw: U256::from(1_000_000_000u64),
        sqrt_price_x96: sqrt_price(),
        liquidity: LIQUIDITY_500,
        fee_bps: 500,
        zero_for_one: true,
        decimals_in: 6,
        decimals_out: 18,
    })
    .unwrap();

    assert_eq!(quote.pool_address, POOL_500);
    assert_eq!(quote.fee, FeeTier::Low);
    assert!(quote.zero_for_one);
    assert_eq!(quote.amount_in_raw, U256::from(1_000_000_000u64));
    assert_eq!(quote.fee_amount, U256::from(50_000_000u64));
    assert_eq!(quote.amount_out, expected.amount_out);
    assert_eq!(quote.sqrt_price_next, expected.sqrt_price_next);
    assert!(quote.amount_out > U256::ZERO);
    assert!(quote.spot_price > 3.0e-4 && quote.spot_price < 4.0e-4);
    assert!((quote.usd_value - 1000.0).abs() < 1e-9);
}

#[tokio::test]
async fn quotes_weth_for_usdc_in_the_other_direction() {
    let quoter = Quoter::new(mainnet_like_chain(), feed(), FACTORY);

    let quote = quoter.get_amount_out(WETH, USDC, 0.5).await.unwrap();

    assert!(!quote.zero_for_one);
    assert_eq!(quote.decimals_in, 18);
    assert_eq!(quote.decimals_out, 6);
    assert_eq!(
        quote.fee_amount,
        U256::from_str("25000000000000000").unwrap()
    );
    assert!(quote.sqrt_price_next < quote.sqrt_price_start);
    // Within one range the raw token0 output tracks the post-fee input up to
    // rounding; 18 -> 6 normalization then drops twelve digits.
    assert!(
        quote.amount_out == U256::from(475_000u64) || quote.amount_out == U256::from(474_999u64),
        "amount_out was {}",
        quote.amount_out
    );
    assert!(quote.spot_price > 2500.0 && quote.spot_price < 3500.0);
    assert!((quote.usd_value - 1478.5).abs() < 1e-9);
}

#[tokio::test]
async fn concurrent_quotes_share_one_quoter() {
    let quoter = Arc::new(Quoter::new(mainnet_like_chain(), feed(), FACTORY));

    let quotes = join_all((0..8).map(|_| {
        let quoter = Arc::clone(&quoter);
        async move { quoter.get_amount_out(USDC, WETH, 250.0).await }
    }))
    .await;

    let first = quotes[0].as_ref().unwrap().clone();
    for quote in quotes {
        assert_eq!(quote.unwrap(), first);
    }
}

#[tokio::test]
async fn unknown_pair_has_no_viable_pool() {
    let quoter = Quoter::new(mainnet_like_chain(), feed(), FACTORY);
    let dai = address!("0x6b175474e89094c44da98b954eedeac495271d0f");

    let err = quoter.get_amount_out(dai, WETH, 1.0).await.unwrap_err();

    assert!(matches!(err, QuoteError::NoViablePool { .. }));
}

#[tokio::test]
async fn lists_pools_for_the_factory() {
    let source = MockLogSource::new(12_400_000)
        .with_event(PoolCreatedEvent {
            token0: USDC,
            token1: WETH,
            fee: 500,
            tick_spacing: 10,
            pool: POOL_500,
            block_number: Some(12_376_729),
        })
        .with_event(PoolCreatedEvent {
            token0: USDC,
            token1: WETH,
            fee: 3000,
            tick_spacing: 60,
            pool: POOL_3000,
            block_number: Some(12_370_624),
        });

    let pools = list_pools(&source, FACTORY, 12_369_621, None).await.unwrap();

    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].address, POOL_500);
    assert_eq!(pools[1].fee, 3000);
    assert_eq!(pools[1].fee_tier(), Some(FeeTier::Medium));

    let json = serde_json::to_value(&pools).unwrap();
    assert_eq!(json[0]["fee"], 500);
    assert!(json[0]["token0"].is_string());
}
