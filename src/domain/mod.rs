//! Domain types for the mempool pool-listing sniper.
//!
//! This module provides:
//! - Ledger primitives: TxId, TxHash, AssetId, AssetUnit, Lovelace
//! - Immutable Transaction and Output records as delivered by the feed

pub mod primitives;
pub mod transaction;

pub use primitives::{AssetId, AssetUnit, Lovelace, TxHash, TxId, LOVELACE_PER_ADA};
pub use transaction::{Output, Transaction};
