//! Configuration management for the FOT resolver
//!
//! Loads configuration from config files and environment variables.
//! Environment variables override file values.

use crate::constants::{chains, fee_detector, wrapped_native_currency, DEFAULT_ALLOWLIST};
use crate::token::FeeFetcherSettings;
use alloy::primitives::U256;
use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// RPC endpoint configuration
    #[serde(default)]
    pub rpc: RpcConfig,
    /// Chain and fee detector configuration
    #[serde(default)]
    pub chain: ChainConfig,
    /// Properties cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Addresses exempt from fee probing
    #[serde(default = "default_allowlist")]
    pub allowlist: Vec<String>,
    /// Static validator classification table
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// RPC endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// HTTP JSON-RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub url: String,
    /// Per-request HTTP timeout in milliseconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_ms: default_rpc_timeout(),
        }
    }
}

impl RpcConfig {
    /// HTTP client for the JSON-RPC transport, with the per-request timeout applied
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
    }
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_rpc_timeout() -> u64 {
    10_000
}

/// Chain and fee detector configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// EVM chain id
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Override for the TokenFeeDetector lens address
    #[serde(default)]
    pub fee_detector_address: Option<String>,
    /// Gas ceiling per single-token simulation
    #[serde(default = "default_gas_limit")]
    pub gas_limit_per_call: u64,
    /// Token units flash-borrowed per probe (decimal string)
    #[serde(default = "default_flash_borrow_amount")]
    pub amount_to_flash_borrow: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            fee_detector_address: None,
            gas_limit_per_call: default_gas_limit(),
            amount_to_flash_borrow: default_flash_borrow_amount(),
        }
    }
}

fn default_chain_id() -> u64 {
    chains::MAINNET
}

fn default_gas_limit() -> u64 {
    fee_detector::GAS_LIMIT_PER_VALIDATE
}

fn default_flash_borrow_amount() -> String {
    fee_detector::AMOUNT_TO_FLASH_BORROW.to_string()
}

/// Properties cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached tokens
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Entry time-to-live in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_seconds: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_cache_ttl() -> i64 {
    3600
}

/// Known classifications fed to the static validator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub fot_tokens: Vec<String>,
    #[serde(default)]
    pub non_fot_tokens: Vec<String>,
}

fn default_allowlist() -> Vec<String> {
    DEFAULT_ALLOWLIST.iter().map(|a| a.to_string()).collect()
}

impl AppConfig {
    /// Load configuration from `config.*` / `config/config.*` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_files(vec![
            File::with_name("config").required(false),
            File::with_name("config/config").required(false),
        ])
    }

    /// Load configuration from a specific file plus the environment
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_files(vec![File::from(path).required(true)])
    }

    fn load_with_files(files: Vec<File<FileSourceFile, FileFormat>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Start with default values
            .set_default("rpc.url", default_rpc_url())?
            .set_default("chain.chain_id", default_chain_id())?;

        // Load from config files (lower priority)
        for file in files {
            builder = builder.add_source(file);
        }

        // Override with environment variables (highest priority - loaded last)
        // FOT_RPC__URL=https://... -> rpc.url
        // FOT_ALLOWLIST=0xabc,0xdef -> allowlist
        let config = builder
            .add_source(
                Environment::with_prefix("FOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowlist")
                    .with_list_parse_key("validator.fot_tokens")
                    .with_list_parse_key("validator.non_fot_tokens"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.url.is_empty() {
            return Err(ConfigError::Message("RPC URL must be set".to_string()));
        }

        if wrapped_native_currency(self.chain.chain_id).is_none() {
            return Err(ConfigError::Message(format!(
                "Chain {} has no known wrapped native currency",
                self.chain.chain_id
            )));
        }

        if self.chain.gas_limit_per_call == 0 {
            return Err(ConfigError::Message(
                "Gas limit per call must be positive".to_string(),
            ));
        }

        match U256::from_str_radix(&self.chain.amount_to_flash_borrow, 10) {
            Ok(amount) if !amount.is_zero() => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Flash borrow amount must be a positive integer, got {}",
                    self.chain.amount_to_flash_borrow
                )))
            }
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::Message(
                "Cache capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Fee fetcher tunables derived from the chain section
    pub fn fee_fetcher_settings(&self) -> FeeFetcherSettings {
        FeeFetcherSettings {
            detector_address: self.chain.fee_detector_address.clone(),
            gas_limit_per_call: self.chain.gas_limit_per_call,
            amount_to_flash_borrow: self.chain.amount_to_flash_borrow.clone(),
        }
    }
}
