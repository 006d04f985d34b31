//! FOT Resolver Library
//!
//! Resolves fee-on-transfer properties for ERC20 tokens.
//! Cheap classification (allowlist, validator, cache) decides which tokens
//! need an on-chain fee simulation; only those are probed.

pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod models;
pub mod token;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use metrics::ResolverMetrics;
pub use models::{ProviderConfig, Token, TokenFeeResult, TokenPropertiesResult, TokenValidationResult};
pub use token::{
    FeeDetector, LruTokenPropertiesCache, OnChainFeeDetector, OnChainTokenFeeFetcher,
    StaticTokenValidator, TokenFeeFetcher, TokenPropertiesCache, TokenPropertiesProvider,
    TokenValidator,
};
