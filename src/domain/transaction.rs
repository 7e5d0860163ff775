//! Ledger transactions and their outputs.

use crate::domain::{AssetId, Lovelace, TxId};
use serde::{Deserialize, Serialize};

/// A destination within a transaction: a coin amount plus native assets.
///
/// Asset order is the order the feed delivered them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub coins: Lovelace,
    pub assets: Vec<(AssetId, u64)>,
}

impl Output {
    pub fn new(coins: Lovelace, assets: Vec<(AssetId, u64)>) -> Self {
        Self { coins, assets }
    }

    /// Output carrying only the base currency.
    pub fn coins_only(coins: Lovelace) -> Self {
        Self::new(coins, Vec::new())
    }

    /// Iterate over the asset ids in delivery order.
    pub fn asset_ids(&self) -> impl Iterator<Item = &AssetId> {
        self.assets.iter().map(|(asset, _)| asset)
    }
}

/// An atomic ledger record containing one or more outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub outputs: Vec<Output>,
}

impl Transaction {
    pub fn new(id: TxId, outputs: Vec<Output>) -> Self {
        Self { id, outputs }
    }
}
