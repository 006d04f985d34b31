//! FOT Resolver - resolves fee-on-transfer properties for token addresses
//! Usage: fot_resolver [--block N] ADDRESS...
//!
//! Prints the resolved properties as JSON keyed by lower-cased address.

use alloy::providers::ProviderBuilder;
use alloy::rpc::client::RpcClient;
use alloy::transports::http::Http;
use fot_resolver::{
    AppConfig, LruTokenPropertiesCache, OnChainFeeDetector, OnChainTokenFeeFetcher,
    ProviderConfig, ResolverMetrics, StaticTokenValidator, Token, TokenPropertiesProvider,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    block_number: Option<u64>,
    addresses: Vec<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut block_number = None;
    let mut addresses = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--block" => {
                match args.get(i + 1).and_then(|v| v.parse::<u64>().ok()) {
                    Some(block) => block_number = Some(block),
                    None => {
                        eprintln!("ERROR: --block requires a block number");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--help" | "-h" => {
                println!("Usage: fot_resolver [--block N] ADDRESS...");
                println!("  --block N  Pin fee simulation to block N (default: latest)");
                println!("Configuration is read from config.* and FOT_* environment variables.");
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
            address => {
                addresses.push(address.to_string());
                i += 1;
            }
        }
    }

    if addresses.is_empty() {
        eprintln!("ERROR: at least one token address is required");
        std::process::exit(1);
    }

    Args {
        block_number,
        addresses,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = parse_args();
    let config = load_config()?;
    let chain_id = config.chain.chain_id;

    tracing::info!(
        chain_id = chain_id,
        tokens = args.addresses.len(),
        block_number = ?args.block_number,
        "Resolving token properties"
    );

    let metrics = Arc::new(ResolverMetrics::new()?);

    let settings = config.fee_fetcher_settings();
    // Timeout applies per JSON-RPC request, never to the resolution as a whole
    let transport = Http::with_client(config.rpc.http_client()?, config.rpc.url.parse()?);
    let rpc = Arc::new(ProviderBuilder::new().connect_client(RpcClient::new(transport, false)));
    let detector = Arc::new(OnChainFeeDetector::new(
        rpc,
        settings.detector_address(chain_id)?,
    ));
    let fee_fetcher = OnChainTokenFeeFetcher::new(chain_id, detector, &settings)?
        .with_metrics(metrics.clone());

    let validator = StaticTokenValidator::new(
        &config.validator.fot_tokens,
        &config.validator.non_fot_tokens,
    );
    let cache = Arc::new(LruTokenPropertiesCache::new(
        chain_id,
        config.cache.capacity,
        config.cache.ttl_seconds,
    ));

    let provider = TokenPropertiesProvider::new(
        chain_id,
        Arc::new(validator),
        cache.clone(),
        Arc::new(fee_fetcher),
        &config.allowlist,
    )
    .with_metrics(metrics.clone());

    let tokens: Vec<Token> = args
        .addresses
        .iter()
        .map(|address| Token::new(chain_id, address.as_str()))
        .collect();
    let provider_config = ProviderConfig {
        block_number: args.block_number,
        ..ProviderConfig::default()
    };

    let results = provider
        .get_tokens_properties(&tokens, &provider_config)
        .await?;

    let ordered: BTreeMap<_, _> = results.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&ordered)?);

    let stats = cache.stats();
    tracing::debug!(
        entries = stats.entries,
        capacity = stats.capacity,
        "Properties cache state"
    );

    let rendered = metrics.render()?;
    tracing::debug!(metrics = %rendered, "Resolver metrics");

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fot_resolver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration
fn load_config() -> anyhow::Result<AppConfig> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    Ok(config)
}
