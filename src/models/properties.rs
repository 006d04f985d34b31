//! Token property models - fee results, merged per-token properties and
//! per-call provider options

use super::TokenValidationResult;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Buy/sell transfer fee of a token, in basis points
///
/// Both sides absent means the fee could not be measured, which is not the
/// same as an explicit zero fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFeeResult {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal_bps")]
    pub buy_fee_bps: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "decimal_bps")]
    pub sell_fee_bps: Option<U256>,
}

impl TokenFeeResult {
    /// Create a fee result with both sides measured
    pub fn new(buy_fee_bps: U256, sell_fee_bps: U256) -> Self {
        Self {
            buy_fee_bps: Some(buy_fee_bps),
            sell_fee_bps: Some(sell_fee_bps),
        }
    }

    /// Fee result carrying no measurement
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether at least one side was measured
    pub fn is_usable(&self) -> bool {
        self.buy_fee_bps.is_some() || self.sell_fee_bps.is_some()
    }
}

/// Basis points written as decimal strings
///
/// Reads decimal strings, `0x` hex strings and plain JSON numbers, so entries
/// written by other cache consumers stay readable.
mod decimal_bps {
    use alloy::primitives::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bps) => serializer.serialize_str(&bps.to_string()),
            None => serializer.serialize_none(),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBps {
        Number(u64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<U256>, D::Error> {
        let Some(raw) = Option::<RawBps>::deserialize(deserializer)? else {
            return Ok(None);
        };

        let parsed = match raw {
            RawBps::Number(bps) => Ok(U256::from(bps)),
            RawBps::Text(text) => match text.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16),
                None => U256::from_str_radix(&text, 10),
            },
        };
        parsed.map(Some).map_err(de::Error::custom)
    }
}

/// Resolved properties of one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPropertiesResult {
    pub token_validation_result: TokenValidationResult,
    /// Present only for FOT tokens with a measured fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_fee_result: Option<TokenFeeResult>,
}

impl TokenPropertiesResult {
    /// Classification-only result
    pub fn classified(token_validation_result: TokenValidationResult) -> Self {
        Self {
            token_validation_result,
            token_fee_result: None,
        }
    }

    /// FOT result with a measured fee
    pub fn fot_with_fee(fee: TokenFeeResult) -> Self {
        Self {
            token_validation_result: TokenValidationResult::Fot,
            token_fee_result: Some(fee),
        }
    }
}

/// Per-call options threaded through every public entry point
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Block to pin on-chain simulation to
    pub block_number: Option<u64>,
    /// Reserved for routing; not read by the resolver
    pub additional_gas_overhead: Option<U256>,
    /// Diagnostic flag; not read by the resolver
    pub debug_routing: bool,
}

impl ProviderConfig {
    /// Options pinned to a block
    pub fn at_block(block_number: u64) -> Self {
        Self {
            block_number: Some(block_number),
            ..Self::default()
        }
    }
}
