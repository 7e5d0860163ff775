//! Fixed parameters of the pool-listing strategy.

use crate::domain::Lovelace;

/// Policy id of the Minswap pool NFT, present in every Minswap pool output.
pub const MINSWAP_POOL_NFT_POLICY_ID: &str =
    "0be55d262b29f564998ff81efe21bdc0022621c12f15af08d0f2ddb1";

/// Hex-encoded asset name of the one ticker we buy ("SPICY").
pub const DEFAULT_TARGET_TICKER_HEX: &str = "5350494359";

/// Length of a hex-encoded policy id (28-byte hash).
pub const POLICY_ID_HEX_LEN: usize = 56;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParams {
    /// Policy id identifying the exchange's liquidity-pool NFT.
    pub pool_nft_policy_id: String,
    /// Distinct assets a pool-creation output carries.
    pub pool_asset_count: usize,
    /// Minimum coins locked in a pool-creation output (inclusive).
    pub min_pool_coins: Lovelace,
    /// Characters of the canonical unit taken up by the policy id.
    pub policy_id_len: usize,
    /// Hex asset name that must follow the policy id.
    pub target_ticker_hex: String,
    /// Pool coins must strictly exceed this to trade.
    pub liquidity_threshold: Lovelace,
    /// Coins spent per trade.
    pub trade_amount: Lovelace,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            pool_nft_policy_id: MINSWAP_POOL_NFT_POLICY_ID.to_string(),
            pool_asset_count: 3,
            min_pool_coins: Lovelace::new(5_000_000_000),
            policy_id_len: POLICY_ID_HEX_LEN,
            target_ticker_hex: DEFAULT_TARGET_TICKER_HEX.to_string(),
            liquidity_threshold: Lovelace::new(300_000_000_000),
            trade_amount: Lovelace::new(1_000_000),
        }
    }
}

impl StrategyParams {
    pub fn with_pool_nft_policy_id(mut self, policy_id: String) -> Self {
        self.pool_nft_policy_id = policy_id;
        self
    }

    pub fn with_target_ticker_hex(mut self, ticker_hex: String) -> Self {
        self.target_ticker_hex = ticker_hex;
        self
    }
}
