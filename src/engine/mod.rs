//! Pure detection and decision logic.
//!
//! Nothing here performs I/O: the stream loop owns the bounded records and
//! lends them in, so every function is deterministic in its inputs.

pub mod bounded;
pub mod extractor;
pub mod matcher;
pub mod params;
pub mod policy;

pub use bounded::{
    BoundedOrderedSet, DedupWindow, PurchaseLedger, DEDUP_WINDOW_CAPACITY,
    PURCHASE_LEDGER_CAPACITY,
};
pub use extractor::{extract_listed_asset, ClassificationError};
pub use matcher::{find_pool_output, is_pool_output};
pub use params::{
    StrategyParams, DEFAULT_TARGET_TICKER_HEX, MINSWAP_POOL_NFT_POLICY_ID, POLICY_ID_HEX_LEN,
};
pub use policy::{evaluate, NoTradeReason, TradeVerdict};
