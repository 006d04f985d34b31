//! Resolution Flow Integration Tests
//!
//! Full pipeline: static validator, LRU cache, on-chain fee fetcher over a
//! scripted detector, and shared metrics.

use crate::mocks::{addr, buy_fee, ScriptedDetector};
use alloy::primitives::U256;
use fot_resolver::constants::chains;
use fot_resolver::token::{token_properties_cache_key, FeeFetcherSettings};
use fot_resolver::{
    LruTokenPropertiesCache, OnChainTokenFeeFetcher, ProviderConfig, ResolverMetrics,
    StaticTokenValidator, Token, TokenFeeResult, TokenPropertiesProvider, TokenPropertiesResult,
    TokenValidationResult,
};
use std::sync::Arc;

const CHAIN: u64 = chains::MAINNET;
const RYOSHI: &str = "0x777e2ae845272a2f540ebf6a3d03734a5a8f618e";

struct Pipeline {
    detector: Arc<ScriptedDetector>,
    cache: Arc<LruTokenPropertiesCache>,
    metrics: Arc<ResolverMetrics>,
    provider: Arc<TokenPropertiesProvider>,
}

/// Tokens 0x01..=0x0f are FOT, 0x10..=0x1f are plain
fn pipeline(detector: ScriptedDetector) -> Pipeline {
    let detector = Arc::new(detector);
    let cache = Arc::new(LruTokenPropertiesCache::default_config(CHAIN));
    let metrics = Arc::new(ResolverMetrics::new().unwrap());

    let mut fot: Vec<String> = (0x01u8..=0x0f).map(addr).collect();
    fot.push(RYOSHI.to_string());
    let validator = StaticTokenValidator::new(fot, (0x10u8..=0x1f).map(addr));

    let fee_fetcher =
        OnChainTokenFeeFetcher::new(CHAIN, detector.clone(), &FeeFetcherSettings::default())
            .unwrap()
            .with_metrics(metrics.clone());

    let provider = TokenPropertiesProvider::with_default_allowlist(
        CHAIN,
        Arc::new(validator),
        cache.clone(),
        Arc::new(fee_fetcher),
    )
    .with_metrics(metrics.clone());

    Pipeline {
        detector,
        cache,
        metrics,
        provider: Arc::new(provider),
    }
}

fn tokens(addresses: &[&str]) -> Vec<Token> {
    addresses.iter().map(|a| Token::new(CHAIN, *a)).collect()
}

#[tokio::test]
async fn test_end_to_end_mixed_batch() {
    let p = pipeline(ScriptedDetector::new(&[(0x01, buy_fee(300))]));
    let (fot, reverting, plain, unknown) = (addr(0x01), addr(0x02), addr(0x10), addr(0x30));

    let result = p
        .provider
        .get_tokens_properties(
            &tokens(&[RYOSHI, fot.as_str(), reverting.as_str(), plain.as_str(), unknown.as_str()]),
            &ProviderConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(
        result[RYOSHI],
        TokenPropertiesResult::classified(TokenValidationResult::Unknown)
    );
    assert_eq!(result[&fot], TokenPropertiesResult::fot_with_fee(buy_fee(300)));
    assert_eq!(
        result[&reverting],
        TokenPropertiesResult::classified(TokenValidationResult::Fot)
    );
    assert_eq!(
        result[&plain],
        TokenPropertiesResult::classified(TokenValidationResult::NonFot)
    );
    assert_eq!(
        result[&unknown],
        TokenPropertiesResult::classified(TokenValidationResult::Unknown)
    );

    // Only the two uncached FOT tokens were simulated
    assert_eq!(p.detector.call_count(), 2);
    // Only the measured token was cached
    assert_eq!(p.cache.len(), 1);
    assert!(p
        .cache
        .get(&token_properties_cache_key(CHAIN, &reverting))
        .is_none());
}

#[tokio::test]
async fn test_second_resolution_served_from_cache() {
    let p = pipeline(ScriptedDetector::new(&[
        (0x01, buy_fee(100)),
        (0x02, TokenFeeResult::new(U256::from(50), U256::from(75))),
    ]));
    let input = tokens(&[addr(0x01).as_str(), addr(0x02).as_str(), addr(0x10).as_str()]);

    let first = p
        .provider
        .get_tokens_properties(&input, &ProviderConfig::default())
        .await
        .unwrap();
    assert_eq!(p.detector.call_count(), 2);

    let second = p
        .provider
        .get_tokens_properties(&input, &ProviderConfig::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(p.detector.call_count(), 2, "no new simulations");
}

#[tokio::test]
async fn test_failed_simulation_retried_next_time() {
    let p = pipeline(ScriptedDetector::default());
    let input = tokens(&[addr(0x03).as_str()]);

    for _ in 0..2 {
        let result = p
            .provider
            .get_tokens_properties(&input, &ProviderConfig::default())
            .await
            .unwrap();
        assert!(result[&addr(0x03)].token_fee_result.is_none());
    }

    // Nothing was cached, so the token was probed both times
    assert_eq!(p.detector.call_count(), 2);
    assert!(p.cache.is_empty());
}

#[tokio::test]
async fn test_concurrent_resolutions_both_simulate() {
    let p = pipeline(ScriptedDetector::new(&[(0x04, buy_fee(400))]));
    let token = addr(0x04);
    let input = tokens(&[token.as_str()]);
    let config = ProviderConfig::default();

    let (left, right) = tokio::join!(
        p.provider.get_tokens_properties(&input, &config),
        p.provider.get_tokens_properties(&input, &config),
    );
    let (left, right) = (left.unwrap(), right.unwrap());

    assert_eq!(left, right);
    // Neither saw the other's write; both probed and both wrote
    assert_eq!(p.detector.call_count(), 2);
    assert_eq!(p.metrics.cache_writes.get(), 2);
    assert_eq!(
        p.cache.get(&token_properties_cache_key(CHAIN, &token)),
        Some(TokenPropertiesResult::fot_with_fee(buy_fee(400)))
    );
}

#[tokio::test]
async fn test_mixed_case_input_resolved_once() {
    let p = pipeline(ScriptedDetector::new(&[(0x05, buy_fee(500))]));
    let token = addr(0x05);
    let upper = format!("0x{}", token.trim_start_matches("0x").to_uppercase());

    let result = p
        .provider
        .get_tokens_properties(
            &tokens(&[upper.as_str(), token.as_str()]),
            &ProviderConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[&token].token_fee_result, Some(buy_fee(500)));
    assert_eq!(p.detector.call_count(), 1);
}

#[tokio::test]
async fn test_block_pin_reaches_detector() {
    let p = pipeline(ScriptedDetector::new(&[(0x06, buy_fee(60))]));

    p.provider
        .get_tokens_properties(&tokens(&[addr(0x06).as_str()]), &ProviderConfig::at_block(18_500_000))
        .await
        .unwrap();

    let calls = p.detector.calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, Some(18_500_000));
}

#[tokio::test]
async fn test_metrics_track_resolution() {
    let p = pipeline(ScriptedDetector::new(&[(0x07, buy_fee(70))]));
    let input = tokens(&[addr(0x07).as_str(), addr(0x08).as_str(), addr(0x11).as_str()]);

    p.provider
        .get_tokens_properties(&input, &ProviderConfig::default())
        .await
        .unwrap();

    assert_eq!(p.metrics.cache_hits.get(), 0);
    assert_eq!(p.metrics.cache_misses.get(), 3);
    assert_eq!(p.metrics.fee_simulations.get(), 2);
    assert_eq!(p.metrics.fee_simulation_failures.get(), 1);
    assert_eq!(p.metrics.cache_writes.get(), 1);
    assert_eq!(p.metrics.cache_write_failures.get(), 0);

    p.provider
        .get_tokens_properties(&input, &ProviderConfig::default())
        .await
        .unwrap();

    assert_eq!(p.metrics.cache_hits.get(), 1);
    assert_eq!(p.metrics.cache_misses.get(), 5);
    // 0x08 is retried, 0x07 is served from cache
    assert_eq!(p.metrics.fee_simulations.get(), 3);

    let rendered = p.metrics.render().unwrap();
    assert!(rendered.contains("fot_resolver_cache_hits_total 1"));
}

#[tokio::test]
async fn test_json_output_shape() {
    let p = pipeline(ScriptedDetector::new(&[(0x09, buy_fee(90))]));
    let token = addr(0x09);

    let result = p
        .provider
        .get_tokens_properties(&tokens(&[token.as_str(), addr(0x12).as_str()]), &ProviderConfig::default())
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json[&token]["tokenValidationResult"], "FOT");
    assert_eq!(json[&token]["tokenFeeResult"]["buyFeeBps"], "90");
    assert!(json[&token]["tokenFeeResult"].get("sellFeeBps").is_none());
    assert_eq!(json[&addr(0x12)]["tokenValidationResult"], "NON_FOT");
    assert!(json[&addr(0x12)].get("tokenFeeResult").is_none());
}
