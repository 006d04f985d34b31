//! On-chain token fee fetching
//!
//! Runs one single-token detector call per address, concurrently, and keeps
//! only the addresses that produced a measurement. Each token gets its own
//! call instead of a batched `batchValidate`: one token that burns the whole
//! gas budget would otherwise fail every other token in the batch.

use super::FeeDetector;
use crate::constants::{fee_detector, fee_detector_address, wrapped_native_currency};
use crate::error::{AppError, AppResult};
use crate::metrics::ResolverMetrics;
use crate::models::{ProviderConfig, TokenFeeResult};
use alloy::primitives::{Address, U256};
use config::ConfigError;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches transfer fees for FOT tokens
#[async_trait::async_trait]
pub trait TokenFeeFetcher: Send + Sync {
    /// Map of address -> fee, restricted to addresses with a usable measurement.
    ///
    /// An absent address means no fee could be obtained, not a zero fee.
    async fn fetch_fees(
        &self,
        addresses: &[String],
        config: &ProviderConfig,
    ) -> AppResult<HashMap<String, TokenFeeResult>>;
}

/// Tunables for the on-chain fee fetcher
#[derive(Debug, Clone)]
pub struct FeeFetcherSettings {
    /// Detector lens address; the chain default when unset
    pub detector_address: Option<String>,
    /// Gas ceiling per single-token call
    pub gas_limit_per_call: u64,
    /// Token units to flash-borrow, as a decimal string
    pub amount_to_flash_borrow: String,
}

impl Default for FeeFetcherSettings {
    fn default() -> Self {
        Self {
            detector_address: None,
            gas_limit_per_call: fee_detector::GAS_LIMIT_PER_VALIDATE,
            amount_to_flash_borrow: fee_detector::AMOUNT_TO_FLASH_BORROW.to_string(),
        }
    }
}

impl FeeFetcherSettings {
    /// Detector address for a chain, honouring the override
    pub fn detector_address(&self, chain_id: u64) -> AppResult<Address> {
        let raw = self
            .detector_address
            .as_deref()
            .unwrap_or_else(|| fee_detector_address(chain_id));

        raw.parse::<Address>().map_err(|e| {
            AppError::Config(ConfigError::Message(format!(
                "Invalid fee detector address {}: {}",
                raw, e
            )))
        })
    }
}

/// [`TokenFeeFetcher`] backed by single-token detector simulations
pub struct OnChainTokenFeeFetcher {
    chain_id: u64,
    detector: Arc<dyn FeeDetector>,
    /// Wrapped native currency of the chain
    base_token: Address,
    gas_limit_per_call: u64,
    amount_to_flash_borrow: U256,
    metrics: Option<Arc<ResolverMetrics>>,
}

impl OnChainTokenFeeFetcher {
    /// Create a fetcher for a chain
    ///
    /// Fails when the chain has no wrapped native currency or the
    /// flash-borrow amount is not a positive decimal integer.
    pub fn new(
        chain_id: u64,
        detector: Arc<dyn FeeDetector>,
        settings: &FeeFetcherSettings,
    ) -> AppResult<Self> {
        let base_token = wrapped_native_currency(chain_id)
            .ok_or_else(|| {
                AppError::Config(ConfigError::Message(format!(
                    "No wrapped native currency known for chain {}",
                    chain_id
                )))
            })?
            .parse::<Address>()
            .map_err(|e| AppError::Internal(format!("Invalid wrapped native address: {}", e)))?;

        let amount_to_flash_borrow = U256::from_str_radix(&settings.amount_to_flash_borrow, 10)
            .map_err(|e| {
                AppError::Config(ConfigError::Message(format!(
                    "Invalid flash borrow amount {}: {}",
                    settings.amount_to_flash_borrow, e
                )))
            })?;
        if amount_to_flash_borrow.is_zero() {
            return Err(AppError::Config(ConfigError::Message(
                "Flash borrow amount must be positive".to_string(),
            )));
        }

        Ok(Self {
            chain_id,
            detector,
            base_token,
            gas_limit_per_call: settings.gas_limit_per_call,
            amount_to_flash_borrow,
            metrics: None,
        })
    }

    /// Attach metrics
    pub fn with_metrics(mut self, metrics: Arc<ResolverMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn base_token(&self) -> Address {
        self.base_token
    }

    /// Simulate one token; failures are logged and yield an empty fee
    async fn fetch_fee(&self, address: &str, config: &ProviderConfig) -> (String, TokenFeeResult) {
        if let Some(ref metrics) = self.metrics {
            metrics.fee_simulations.inc();
        }

        match self.simulate(address, config).await {
            Ok(fee) => {
                tracing::trace!(
                    token = address,
                    buy_fee_bps = ?fee.buy_fee_bps,
                    sell_fee_bps = ?fee.sell_fee_bps,
                    "Fee detector returned"
                );
                (address.to_string(), fee)
            }
            Err(e) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.fee_simulation_failures.inc();
                }
                tracing::error!(
                    token = address,
                    chain_id = self.chain_id,
                    error = %e,
                    "Error calling validate on-chain for token"
                );
                (address.to_string(), TokenFeeResult::empty())
            }
        }
    }

    async fn simulate(&self, address: &str, config: &ProviderConfig) -> AppResult<TokenFeeResult> {
        let token = address
            .parse::<Address>()
            .map_err(|e| AppError::Validation(format!("Invalid token address: {}", e)))?;

        self.detector
            .validate(
                token,
                self.base_token,
                self.amount_to_flash_borrow,
                self.gas_limit_per_call,
                config.block_number,
            )
            .await
    }
}

#[async_trait::async_trait]
impl TokenFeeFetcher for OnChainTokenFeeFetcher {
    async fn fetch_fees(
        &self,
        addresses: &[String],
        config: &ProviderConfig,
    ) -> AppResult<HashMap<String, TokenFeeResult>> {
        // Every call settles on its own; join_all never short-circuits
        let results = join_all(
            addresses
                .iter()
                .map(|address| self.fetch_fee(address, config)),
        )
        .await;

        let fees: HashMap<String, TokenFeeResult> = results
            .into_iter()
            .filter(|(_, fee)| fee.is_usable())
            .collect();

        tracing::debug!(
            chain_id = self.chain_id,
            requested = addresses.len(),
            measured = fees.len(),
            block_number = ?config.block_number,
            "Fetched token fees on-chain"
        );

        Ok(fees)
    }
}
