//! On-chain fee detector call layer
//!
//! Wraps the TokenFeeDetector lens. A `validate` call flash-borrows a small
//! amount of the token from its pool against the base token, transfers it
//! around and reports the observed buy/sell fee. It always runs as
//! `eth_call`, so nothing is persisted on-chain.

use crate::error::{AppError, AppResult};
use crate::models::TokenFeeResult;
use alloy::eips::BlockId;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::sol;
use std::sync::Arc;

sol! {
    #[sol(rpc)]
    interface ITokenFeeDetector {
        struct TokenFees {
            uint256 buyFeeBps;
            uint256 sellFeeBps;
        }

        function validate(address token, address baseToken, uint256 amountToBorrow)
            external
            returns (TokenFees memory fotResult);
    }
}

/// Single-token fee simulation
#[async_trait::async_trait]
pub trait FeeDetector: Send + Sync {
    /// Simulate one token's transfer fee; reverts and transport failures are errors
    async fn validate(
        &self,
        token: Address,
        base_token: Address,
        amount_to_borrow: U256,
        gas_limit: u64,
        block_number: Option<u64>,
    ) -> AppResult<TokenFeeResult>;
}

/// [`FeeDetector`] calling a deployed TokenFeeDetector through an alloy provider
pub struct OnChainFeeDetector<P> {
    provider: Arc<P>,
    detector_address: Address,
}

impl<P: Provider + Send + Sync> OnChainFeeDetector<P> {
    pub fn new(provider: Arc<P>, detector_address: Address) -> Self {
        Self {
            provider,
            detector_address,
        }
    }
}

#[async_trait::async_trait]
impl<P: Provider + Send + Sync + 'static> FeeDetector for OnChainFeeDetector<P> {
    async fn validate(
        &self,
        token: Address,
        base_token: Address,
        amount_to_borrow: U256,
        gas_limit: u64,
        block_number: Option<u64>,
    ) -> AppResult<TokenFeeResult> {
        let detector = ITokenFeeDetector::new(self.detector_address, &self.provider);

        let mut call = detector
            .validate(token, base_token, amount_to_borrow)
            .gas(gas_limit);
        if let Some(block) = block_number {
            call = call.block(BlockId::number(block));
        }

        let fees = call
            .call()
            .await
            .map_err(|e| AppError::Rpc(format!("Fee detector validate failed: {}", e)))?;

        Ok(TokenFeeResult::new(fees.buyFeeBps, fees.sellFeeBps))
    }
}
