use alloy_primitives::{Address, BlockNumber};
use alloy_provider::ProviderBuilder;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clmm_quote::Quoter;
use clmm_quote::config::QuoteConfig;
use clmm_quote::onchain::{RpcChainReader, RpcLogSource};
use clmm_quote::pool::FeeTier;
use clmm_quote::pool::registry::list_pools;
use clmm_quote::price_feed::CryptoCompareFeed;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clmm-quote")]
#[command(about = "Quote swaps and list pools of a Uniswap V3-style factory", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CommonArgs {
    /// TOML config file
    #[arg(short, long, global = true, env = "CLMM_QUOTE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides `rpc_url`
    #[arg(long, global = true, env = "CLMM_QUOTE_RPC_URL")]
    rpc_url: Option<String>,

    /// Factory address, overrides `factory_address`
    #[arg(long, global = true)]
    factory: Option<Address>,
}

#[derive(Subcommand)]
enum Command {
    /// Quote an exact-input swap and print it as JSON
    Quote {
        #[arg(long)]
        token_in: Address,

        #[arg(long)]
        token_out: Address,

        /// Input amount in whole tokens
        #[arg(long)]
        amount: f64,
    },
    /// Ask the periphery quoter contract for the raw output amount
    OnchainQuote {
        #[arg(long)]
        token_in: Address,

        #[arg(long)]
        token_out: Address,

        /// Pool fee: 100, 500, 3000 or 10000
        #[arg(long, value_parser = parse_fee_tier)]
        fee: FeeTier,

        /// Input amount in whole tokens
        #[arg(long)]
        amount: f64,

        /// Quoter address, overrides `quoter_address`
        #[arg(long)]
        quoter: Option<Address>,
    },
    /// List pools created by the factory and print them as JSON
    Pools {
        /// Defaults to `discovery_start_block`
        #[arg(long)]
        from_block: Option<BlockNumber>,

        /// Defaults to the latest block
        #[arg(long)]
        to_block: Option<BlockNumber>,
    },
}

fn parse_fee_tier(raw: &str) -> Result<FeeTier, String> {
    let fee: u32 = raw.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    FeeTier::try_from(fee).map_err(|e| e.to_string())
}

fn load_config(args: &CommonArgs) -> anyhow::Result<QuoteConfig> {
    let mut config = match &args.config {
        Some(path) => QuoteConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => QuoteConfig::default(),
    };

    if let Some(rpc_url) = &args.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(factory) = args.factory {
        config.factory_address = Some(factory);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.common)?;
    let factory = config.factory().context("pass --factory or set factory_address")?;

    let rpc_url = config
        .rpc_url
        .parse()
        .with_context(|| format!("invalid rpc url {}", config.rpc_url))?;
    let provider = Arc::new(ProviderBuilder::new().connect_http(rpc_url));

    match cli.command {
        Command::Quote {
            token_in,
            token_out,
            amount,
        } => {
            let feed = CryptoCompareFeed::new(config.price_feed_url.clone())?;
            let quoter = Quoter::new(RpcChainReader::new(provider), feed, factory)
                .with_fee_tiers(config.fee_tiers.clone());

            let quote = quoter
                .get_amount_out(token_in, token_out, amount)
                .await
                .context("quote failed")?;

            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Command::OnchainQuote {
            token_in,
            token_out,
            fee,
            amount,
            quoter,
        } => {
            let quoter_address = match quoter {
                Some(address) => address,
                None => config.quoter().context("pass --quoter or set quoter_address")?,
            };
            let feed = CryptoCompareFeed::new(config.price_feed_url.clone())?;
            let quoter = Quoter::new(RpcChainReader::new(provider), feed, factory);

            let amount_out = quoter
                .onchain_amount_out(quoter_address, token_in, token_out, fee, amount)
                .await
                .context("onchain quote failed")?;

            let output = serde_json::json!({
                "quoter": quoter_address,
                "fee": fee,
                "amountOut": amount_out.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Pools {
            from_block,
            to_block,
        } => {
            let source = RpcLogSource::with_chunk_size(provider, config.log_chunk_size)
                .with_concurrency(config.log_concurrency);
            let from_block = from_block.unwrap_or(config.discovery_start_block);

            let pools = list_pools(&source, factory, from_block, to_block)
                .await
                .context("pool discovery failed")?;

            println!("{}", serde_json::to_string_pretty(&pools)?);
        }
    }

    Ok(())
}
