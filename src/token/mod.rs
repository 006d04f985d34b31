//! Token properties resolution
//!
//! Combines a cheap path and an expensive path:
//! - Cheap: allowlist, validator classification and cached properties
//! - Expensive: on-chain fee simulation, only for uncached FOT tokens

mod cache;
mod detector;
mod fee_fetcher;
mod properties;
mod validator;

pub use cache::*;
pub use detector::*;
pub use fee_fetcher::*;
pub use properties::*;
pub use validator::*;
