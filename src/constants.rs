/// EVM chain ids the resolver knows wrapped-native addresses for
pub mod chains {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const BNB: u64 = 56;
    pub const POLYGON: u64 = 137;
    pub const ZKSYNC: u64 = 324;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM_ONE: u64 = 42161;
    pub const CELO: u64 = 42220;
    pub const AVALANCHE: u64 = 43114;
    pub const BLAST: u64 = 81457;
    pub const SEPOLIA: u64 = 11155111;
}

/// Fee detector lens parameters
pub mod fee_detector {
    /// Address at which the TokenFeeDetector lens is deployed
    pub const DEFAULT_ADDRESS: &str = "0x19C97dc2a25845C7f9d1d519c8C2d4809c58b43f";

    /// Token units flash-borrowed per probe.
    ///
    /// 10000 is the smallest amount without bps rounding error, and small
    /// enough that most v2 pools hold at least that many units.
    pub const AMOUNT_TO_FLASH_BORROW: &str = "10000";

    /// Gas ceiling for a single-token `validate` call, well above a swap
    pub const GAS_LIMIT_PER_VALIDATE: u64 = 1_000_000;
}

/// Tokens exempt from fee probing.
///
/// RYOSHI rejects contract-to-contract transfers, so the detector always
/// fails on it.
pub const DEFAULT_ALLOWLIST: &[&str] = &["0x777e2ae845272a2f540ebf6a3d03734a5a8f618e"];

/// Wrapped native currency for a chain, used as the probe's base token
pub fn wrapped_native_currency(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        chains::MAINNET => Some("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        chains::OPTIMISM | chains::BASE => Some("0x4200000000000000000000000000000000000006"),
        chains::BNB => Some("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"),
        chains::POLYGON => Some("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"),
        chains::ZKSYNC => Some("0x5AEa5775959fBC2557Cc8789bC1bf90A239D9a91"),
        chains::ARBITRUM_ONE => Some("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
        chains::CELO => Some("0x471EcE3750Da237f93B8E339c536989b8978a438"),
        chains::AVALANCHE => Some("0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7"),
        chains::BLAST => Some("0x4300000000000000000000000000000000000004"),
        chains::SEPOLIA => Some("0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14"),
        _ => None,
    }
}

/// Fee detector address for a chain
///
/// Only one deployment exists; every chain resolves to it until overridden
/// through configuration.
pub fn fee_detector_address(_chain_id: u64) -> &'static str {
    fee_detector::DEFAULT_ADDRESS
}
