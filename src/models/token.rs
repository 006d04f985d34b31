//! Token models - tokens under resolution and their classification

use serde::{Deserialize, Serialize};

/// An ERC20 token on a specific chain
///
/// Addresses compare case-insensitively; use [`Token::normalized_address`]
/// for keying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Chain the token lives on
    pub chain_id: u64,
    /// Contract address as supplied by the caller
    pub address: String,
}

impl Token {
    /// Create a new token
    pub fn new(chain_id: u64, address: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: address.into(),
        }
    }

    /// Lower-cased address used as the key in every result map
    pub fn normalized_address(&self) -> String {
        self.address.to_lowercase()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address.eq_ignore_ascii_case(&other.address)
    }
}

impl Eq for Token {}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.normalized_address().hash(state);
    }
}

/// Fee-on-transfer classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenValidationResult {
    /// Not classified (allowlisted, or the validator could not tell)
    #[default]
    #[serde(rename = "UNKN")]
    Unknown,
    /// Transfers deduct a fee
    #[serde(rename = "FOT")]
    Fot,
    /// Transfers deliver the full amount
    #[serde(rename = "NON_FOT")]
    NonFot,
}

impl TokenValidationResult {
    /// Whether this classification asks for an on-chain fee probe
    pub fn is_fot(&self) -> bool {
        matches!(self, TokenValidationResult::Fot)
    }
}

impl std::fmt::Display for TokenValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValidationResult::Unknown => write!(f, "UNKN"),
            TokenValidationResult::Fot => write!(f, "FOT"),
            TokenValidationResult::NonFot => write!(f, "NON_FOT"),
        }
    }
}
