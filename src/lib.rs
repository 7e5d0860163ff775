pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod executor;
pub mod feed;
pub mod logging;
pub mod orchestration;

pub use config::Config;
pub use domain::{AssetId, AssetUnit, Lovelace, Output, Transaction, TxHash, TxId};
pub use engine::{StrategyParams, TradeVerdict};
pub use error::AppError;
pub use executor::{ExecutionError, MockTradeExecutor, SwapGatewayExecutor, SwapOrder, TradeExecutor};
pub use feed::{FeedError, MockTransactionFeed, OgmiosFeed, TransactionFeed};
pub use orchestration::{PipelineStats, StreamLoop};
