//! Trade execution abstraction: building, signing and submitting swaps.

use crate::domain::{AssetUnit, Lovelace, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod gateway;
pub mod mock;

pub use gateway::SwapGatewayExecutor;
pub use mock::MockTradeExecutor;

/// Smallest acceptable output of a sniping swap: take whatever the pool gives.
pub const MINIMUM_AMOUNT_OUT: u64 = 1;

/// An exact-in swap of base currency for a native asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOrder {
    pub amount_in: Lovelace,
    pub asset_out: AssetUnit,
    pub minimum_amount_out: u64,
}

impl SwapOrder {
    pub fn exact_in(amount_in: Lovelace, asset_out: AssetUnit) -> Self {
        Self {
            amount_in,
            asset_out,
            minimum_amount_out: MINIMUM_AMOUNT_OUT,
        }
    }
}

/// Executes swaps on the exchange.
///
/// Implementations handle wallet selection, order construction, signing and
/// submission. Called at most once per positive trade verdict; never retried
/// by the caller.
#[async_trait]
pub trait TradeExecutor: Send + Sync + fmt::Debug {
    async fn submit(&self, order: SwapOrder) -> Result<TxHash, ExecutionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Rate limited")]
    RateLimited,
    #[error("Order rejected: {0}")]
    Rejected(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Executor panicked")]
    Panicked,
}
