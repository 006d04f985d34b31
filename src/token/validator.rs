//! Token validator seam
//!
//! The validator decides whether a token is fee-on-transfer. How it decides
//! is its own business; the resolver only consumes the classification.

use crate::error::AppResult;
use crate::models::{ProviderConfig, Token, TokenValidationResult};
use std::collections::{HashMap, HashSet};

/// Batch classification returned by a [`TokenValidator`]
#[derive(Debug, Clone, Default)]
pub struct TokenValidationResults {
    /// Lower-cased address -> classification
    results: HashMap<String, TokenValidationResult>,
}

impl TokenValidationResults {
    /// Create from a map keyed by address (any case)
    pub fn new(results: HashMap<String, TokenValidationResult>) -> Self {
        Self {
            results: results
                .into_iter()
                .map(|(address, result)| (address.to_lowercase(), result))
                .collect(),
        }
    }

    /// Classification for a token; tokens the validator did not report on are `Unknown`
    pub fn get_validation_by_token(&self, token: &Token) -> TokenValidationResult {
        self.results
            .get(&token.normalized_address())
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Classifies tokens as FOT / non-FOT / unknown
///
/// Must accept an empty batch.
#[async_trait::async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_tokens(
        &self,
        tokens: &[Token],
        config: &ProviderConfig,
    ) -> AppResult<TokenValidationResults>;
}

/// Validator backed by a fixed classification table
///
/// Tokens outside the table are `Unknown`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenValidator {
    fot_tokens: HashSet<String>,
    non_fot_tokens: HashSet<String>,
}

impl StaticTokenValidator {
    pub fn new<I, J, S, T>(fot_tokens: I, non_fot_tokens: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            fot_tokens: fot_tokens
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .collect(),
            non_fot_tokens: non_fot_tokens
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn classify(&self, address: &str) -> TokenValidationResult {
        if self.fot_tokens.contains(address) {
            TokenValidationResult::Fot
        } else if self.non_fot_tokens.contains(address) {
            TokenValidationResult::NonFot
        } else {
            TokenValidationResult::Unknown
        }
    }
}

#[async_trait::async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate_tokens(
        &self,
        tokens: &[Token],
        _config: &ProviderConfig,
    ) -> AppResult<TokenValidationResults> {
        let results = tokens
            .iter()
            .map(|token| {
                let address = token.normalized_address();
                let result = self.classify(&address);
                (address, result)
            })
            .collect();

        Ok(TokenValidationResults::new(results))
    }
}
