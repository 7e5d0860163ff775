//! Recognising liquidity-pool creation outputs.

use super::StrategyParams;
use crate::domain::{Output, Transaction};
use std::collections::HashSet;

/// Return the first output of `tx` that looks like a freshly created pool.
///
/// An output qualifies when it carries exactly `pool_asset_count` distinct
/// assets, at least `min_pool_coins`, and an asset issued under the pool NFT
/// policy. Later qualifying outputs in the same transaction are ignored.
pub fn find_pool_output<'a>(tx: &'a Transaction, params: &StrategyParams) -> Option<&'a Output> {
    tx.outputs
        .iter()
        .find(|output| is_pool_output(output, params))
}

pub fn is_pool_output(output: &Output, params: &StrategyParams) -> bool {
    has_pool_asset_count(output, params)
        && output.coins >= params.min_pool_coins
        && carries_pool_nft(output, params)
}

fn has_pool_asset_count(output: &Output, params: &StrategyParams) -> bool {
    let distinct: HashSet<_> = output.asset_ids().collect();
    distinct.len() == params.pool_asset_count
}

fn carries_pool_nft(output: &Output, params: &StrategyParams) -> bool {
    output
        .asset_ids()
        .any(|asset| asset.policy_id() == params.pool_nft_policy_id)
}
