//! OnChainTokenFeeFetcher Unit Tests
//!
//! Drives the real fetcher against a scripted detector.

use crate::mocks::{addr, buy_fee, ScriptedDetector};
use alloy::primitives::{Address, U256};
use fot_resolver::constants::chains;
use fot_resolver::token::{FeeFetcherSettings, OnChainTokenFeeFetcher, TokenFeeFetcher};
use fot_resolver::{ProviderConfig, TokenFeeResult};
use std::sync::Arc;

fn fetcher(detector: Arc<ScriptedDetector>) -> OnChainTokenFeeFetcher {
    OnChainTokenFeeFetcher::new(chains::MAINNET, detector, &FeeFetcherSettings::default())
        .unwrap()
}

#[tokio::test]
async fn test_one_failing_token_does_not_poison_batch() {
    // Token 0x05 has no script and reverts
    let detector = Arc::new(ScriptedDetector::new(&[
        (1, buy_fee(100)),
        (2, buy_fee(200)),
        (3, buy_fee(300)),
        (4, buy_fee(400)),
    ]));
    let addresses: Vec<String> = (1u8..=5).map(addr).collect();

    let fees = fetcher(detector.clone())
        .fetch_fees(&addresses, &ProviderConfig::default())
        .await
        .unwrap();

    assert_eq!(fees.len(), 4);
    assert!(!fees.contains_key(&addr(5)));
    assert_eq!(fees[&addr(3)], buy_fee(300));
    // Every token got its own call
    assert_eq!(detector.call_count(), 5);
}

#[tokio::test]
async fn test_empty_measurement_filtered() {
    let detector = Arc::new(ScriptedDetector::new(&[
        (1, TokenFeeResult::empty()),
        (2, TokenFeeResult::new(U256::ZERO, U256::from(25))),
    ]));

    let fees = fetcher(detector)
        .fetch_fees(&[addr(1), addr(2)], &ProviderConfig::default())
        .await
        .unwrap();

    assert_eq!(fees.len(), 1);
    assert_eq!(fees[&addr(2)].sell_fee_bps, Some(U256::from(25)));
}

#[tokio::test]
async fn test_block_pin_forwarded() {
    let detector = Arc::new(ScriptedDetector::new(&[(1, buy_fee(1)), (2, buy_fee(2))]));

    fetcher(detector.clone())
        .fetch_fees(&[addr(1), addr(2)], &ProviderConfig::at_block(19_000_000))
        .await
        .unwrap();

    let calls = detector.calls.lock().clone();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(_, block)| *block == Some(19_000_000)));
}

#[tokio::test]
async fn test_latest_block_when_unpinned() {
    let detector = Arc::new(ScriptedDetector::new(&[(1, buy_fee(1))]));

    fetcher(detector.clone())
        .fetch_fees(&[addr(1)], &ProviderConfig::default())
        .await
        .unwrap();

    assert_eq!(
        detector.calls.lock().clone(),
        vec![(Address::with_last_byte(1), None)]
    );
}

#[tokio::test]
async fn test_empty_input_makes_no_calls() {
    let detector = Arc::new(ScriptedDetector::default());

    let fees = fetcher(detector.clone())
        .fetch_fees(&[], &ProviderConfig::default())
        .await
        .unwrap();

    assert!(fees.is_empty());
    assert_eq!(detector.call_count(), 0);
}

#[tokio::test]
async fn test_all_tokens_failing_yields_empty_map() {
    let detector = Arc::new(ScriptedDetector::default());

    let fees = fetcher(detector.clone())
        .fetch_fees(&[addr(1), addr(2), addr(3)], &ProviderConfig::default())
        .await
        .expect("per-token failures must not fail the batch");

    assert!(fees.is_empty());
    assert_eq!(detector.call_count(), 3);
}
