//! Data models for token property resolution

mod properties;
mod token;

pub use properties::{ProviderConfig, TokenFeeResult, TokenPropertiesResult};
pub use token::{Token, TokenValidationResult};
