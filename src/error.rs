//! Error types for the FOT resolver

use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Validation error (malformed input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// RPC / on-chain call error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Token properties cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Token validator error
    #[error("Validator error: {0}")]
    Validator(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error comes from a collaborator the resolver cannot route around
    pub fn is_collaborator_fault(&self) -> bool {
        matches!(self, AppError::Cache(_) | AppError::Validator(_))
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
