//! Trade decision for a newly listed asset.

use super::{PurchaseLedger, StrategyParams};
use crate::domain::{AssetUnit, Lovelace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTradeReason {
    /// Bought within the retention window.
    AlreadyPurchased,
    /// Asset name is not the target ticker.
    TickerMismatch,
    /// Pool liquidity does not exceed the threshold.
    InsufficientLiquidity,
}

impl std::fmt::Display for NoTradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoTradeReason::AlreadyPurchased => write!(f, "already purchased"),
            NoTradeReason::TickerMismatch => write!(f, "ticker mismatch"),
            NoTradeReason::InsufficientLiquidity => write!(f, "insufficient liquidity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeVerdict {
    NoTrade(NoTradeReason),
    Trade {
        amount_in: Lovelace,
        asset_out: AssetUnit,
    },
}

impl TradeVerdict {
    pub fn is_trade(&self) -> bool {
        matches!(self, TradeVerdict::Trade { .. })
    }
}

/// Decide whether to buy `unit`, listed in a pool holding `pool_coins`.
///
/// Gates, in order: never re-buy an asset still in the purchase ledger; then
/// require the target ticker and strictly more than the liquidity threshold.
pub fn evaluate(
    unit: &AssetUnit,
    pool_coins: Lovelace,
    purchases: &PurchaseLedger,
    params: &StrategyParams,
) -> TradeVerdict {
    if purchases.contains(unit) {
        return TradeVerdict::NoTrade(NoTradeReason::AlreadyPurchased);
    }

    if unit.asset_name_hex(params.policy_id_len) != params.target_ticker_hex {
        return TradeVerdict::NoTrade(NoTradeReason::TickerMismatch);
    }

    if pool_coins <= params.liquidity_threshold {
        return TradeVerdict::NoTrade(NoTradeReason::InsufficientLiquidity);
    }

    TradeVerdict::Trade {
        amount_in: params.trade_amount,
        asset_out: unit.clone(),
    }
}
