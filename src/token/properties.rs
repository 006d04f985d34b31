//! TokenPropertiesProvider - resolves FOT classification and fees per token
//!
//! Resolution order for each token:
//! - Allowlisted: always `Unknown`, never probed
//! - Validator classification, overridden by a cached entry when one exists
//! - Uncached FOT tokens: on-chain fee simulation, written back to the cache

use super::{token_properties_cache_key, TokenFeeFetcher, TokenPropertiesCache, TokenValidator};
use crate::constants::DEFAULT_ALLOWLIST;
use crate::error::AppResult;
use crate::metrics::ResolverMetrics;
use crate::models::{ProviderConfig, Token, TokenPropertiesResult, TokenValidationResult};
use futures_util::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Resolves token properties from the allowlist, validator, cache and fee fetcher
pub struct TokenPropertiesProvider {
    chain_id: u64,
    validator: Arc<dyn TokenValidator>,
    cache: Arc<dyn TokenPropertiesCache>,
    fee_fetcher: Arc<dyn TokenFeeFetcher>,
    /// Lower-cased addresses exempt from fee probing
    allowlist: HashSet<String>,
    metrics: Option<Arc<ResolverMetrics>>,
}

impl TokenPropertiesProvider {
    /// Create a new provider
    pub fn new<I, S>(
        chain_id: u64,
        validator: Arc<dyn TokenValidator>,
        cache: Arc<dyn TokenPropertiesCache>,
        fee_fetcher: Arc<dyn TokenFeeFetcher>,
        allowlist: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            chain_id,
            validator,
            cache,
            fee_fetcher,
            allowlist: allowlist
                .into_iter()
                .map(|address| address.as_ref().to_lowercase())
                .collect(),
            metrics: None,
        }
    }

    /// Create a provider using [`DEFAULT_ALLOWLIST`]
    pub fn with_default_allowlist(
        chain_id: u64,
        validator: Arc<dyn TokenValidator>,
        cache: Arc<dyn TokenPropertiesCache>,
        fee_fetcher: Arc<dyn TokenFeeFetcher>,
    ) -> Self {
        Self::new(
            chain_id,
            validator,
            cache,
            fee_fetcher,
            DEFAULT_ALLOWLIST.iter().copied(),
        )
    }

    /// Attach metrics
    pub fn with_metrics(mut self, metrics: Arc<ResolverMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Resolve properties for every token, keyed by lower-cased address
    ///
    /// Token-specific failures degrade to classification-only entries.
    /// Only validator and cache faults are returned as errors.
    pub async fn get_tokens_properties(
        &self,
        tokens: &[Token],
        config: &ProviderConfig,
    ) -> AppResult<HashMap<String, TokenPropertiesResult>> {
        let non_allowlist_tokens: Vec<Token> = tokens
            .iter()
            .filter(|token| !self.is_allowlisted(token))
            .cloned()
            .collect();
        let validation_results = self
            .validator
            .validate_tokens(&non_allowlist_tokens, config)
            .await?;

        let mut token_to_result: HashMap<String, TokenPropertiesResult> = tokens
            .iter()
            .map(|token| {
                let classification = if self.is_allowlisted(token) {
                    // Unknown keeps allowlisted tokens away from the fee detector
                    TokenValidationResult::Unknown
                } else {
                    validation_results.get_validation_by_token(token)
                };
                (
                    token.normalized_address(),
                    TokenPropertiesResult::classified(classification),
                )
            })
            .collect();

        let addresses = Self::build_addresses(tokens);
        let cached = self.cache.batch_get(&addresses).await?;

        let mut addresses_to_fetch = Vec::new();
        for address in &addresses {
            if let Some(cached_value) = cached.get(address) {
                token_to_result.insert(address.clone(), cached_value.clone());
            } else if token_to_result
                .get(address)
                .is_some_and(|result| result.token_validation_result.is_fot())
            {
                addresses_to_fetch.push(address.clone());
            }
        }
        addresses_to_fetch.sort();

        if let Some(ref metrics) = self.metrics {
            metrics.cache_hits.inc_by(cached.len() as u64);
            metrics
                .cache_misses
                .inc_by(addresses.len().saturating_sub(cached.len()) as u64);
        }

        tracing::debug!(
            chain_id = self.chain_id,
            tokens = tokens.len(),
            cache_hits = cached.len(),
            to_fetch = addresses_to_fetch.len(),
            "Token properties merged from validator and cache"
        );

        if !addresses_to_fetch.is_empty() {
            self.fetch_and_store_fees(&addresses_to_fetch, &mut token_to_result, config)
                .await;
        }

        Ok(token_to_result)
    }

    /// Fetch fees for uncached FOT tokens, attach them and write them back
    async fn fetch_and_store_fees(
        &self,
        addresses: &[String],
        token_to_result: &mut HashMap<String, TokenPropertiesResult>,
        config: &ProviderConfig,
    ) {
        let token_fee_map = match self.fee_fetcher.fetch_fees(addresses, config).await {
            Ok(fees) => fees,
            Err(e) => {
                tracing::error!(
                    chain_id = self.chain_id,
                    tokens = ?addresses,
                    error = %e,
                    "Error fetching fees for tokens"
                );
                HashMap::new()
            }
        };

        let mut writes = Vec::new();
        for address in addresses {
            let Some(fee) = token_fee_map.get(address).filter(|fee| fee.is_usable()) else {
                // Inconclusive: keep classification only and leave the cache alone
                tracing::debug!(token = %address, "No usable fee obtained, skipping cache write");
                continue;
            };

            if let Some(result) = token_to_result.get_mut(address) {
                result.token_fee_result = Some(*fee);
            }

            // A measured fee means fee-bearing behaviour was observed
            let key = token_properties_cache_key(self.chain_id, address);
            let value = TokenPropertiesResult::fot_with_fee(*fee);
            writes.push(async move {
                let outcome = self.cache.set(&key, value).await;
                (address, outcome)
            });
        }

        // Wait for every write so that returning implies all writes were attempted
        for (address, outcome) in join_all(writes).await {
            match outcome {
                Ok(_) => {
                    if let Some(ref metrics) = self.metrics {
                        metrics.cache_writes.inc();
                    }
                }
                Err(e) => {
                    if let Some(ref metrics) = self.metrics {
                        metrics.cache_write_failures.inc();
                    }
                    tracing::warn!(
                        token = %address,
                        error = %e,
                        "Failed to cache token properties"
                    );
                }
            }
        }
    }

    fn is_allowlisted(&self, token: &Token) -> bool {
        self.allowlist.contains(&token.normalized_address())
    }

    /// Deduplicated lower-cased addresses of the input tokens
    fn build_addresses(tokens: &[Token]) -> HashSet<String> {
        tokens.iter().map(Token::normalized_address).collect()
    }
}
