//! Pipeline counters shared between the stream loop and the status API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct PipelineStats {
    started_at: DateTime<Utc>,
    transactions_fetched: AtomicU64,
    duplicates_filtered: AtomicU64,
    transactions_processed: AtomicU64,
    pools_found: AtomicU64,
    purchase_skips: AtomicU64,
    classification_errors: AtomicU64,
    feed_errors: AtomicU64,
    trades_initiated: AtomicU64,
    trades_succeeded: AtomicU64,
    trades_failed: AtomicU64,
    trades_abandoned: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub transactions_fetched: u64,
    pub duplicates_filtered: u64,
    pub transactions_processed: u64,
    pub pools_found: u64,
    pub purchase_skips: u64,
    pub classification_errors: u64,
    pub feed_errors: u64,
    pub trades_initiated: u64,
    pub trades_succeeded: u64,
    pub trades_failed: u64,
    /// Aborted at shutdown before settling.
    pub trades_abandoned: u64,
    /// Dispatched but not yet settled.
    pub trades_in_flight: u64,
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            transactions_fetched: AtomicU64::new(0),
            duplicates_filtered: AtomicU64::new(0),
            transactions_processed: AtomicU64::new(0),
            pools_found: AtomicU64::new(0),
            purchase_skips: AtomicU64::new(0),
            classification_errors: AtomicU64::new(0),
            feed_errors: AtomicU64::new(0),
            trades_initiated: AtomicU64::new(0),
            trades_succeeded: AtomicU64::new(0),
            trades_failed: AtomicU64::new(0),
            trades_abandoned: AtomicU64::new(0),
        }
    }

    pub fn record_fetched(&self, count: usize) {
        bump(&self.transactions_fetched, count as u64);
    }

    pub fn record_duplicate(&self) {
        bump(&self.duplicates_filtered, 1);
    }

    pub fn record_processed(&self) {
        bump(&self.transactions_processed, 1);
    }

    pub fn record_pool_found(&self) {
        bump(&self.pools_found, 1);
    }

    pub fn record_purchase_skip(&self) {
        bump(&self.purchase_skips, 1);
    }

    pub fn record_classification_error(&self) {
        bump(&self.classification_errors, 1);
    }

    pub fn record_feed_error(&self) {
        bump(&self.feed_errors, 1);
    }

    pub fn record_trade_initiated(&self) {
        bump(&self.trades_initiated, 1);
    }

    pub fn record_trade_succeeded(&self) {
        bump(&self.trades_succeeded, 1);
    }

    pub fn record_trade_failed(&self) {
        bump(&self.trades_failed, 1);
    }

    pub fn record_trade_abandoned(&self) {
        bump(&self.trades_abandoned, 1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        let trades_initiated = load(&self.trades_initiated);
        let trades_succeeded = load(&self.trades_succeeded);
        let trades_failed = load(&self.trades_failed);
        let trades_abandoned = load(&self.trades_abandoned);
        StatsSnapshot {
            started_at: self.started_at,
            transactions_fetched: load(&self.transactions_fetched),
            duplicates_filtered: load(&self.duplicates_filtered),
            transactions_processed: load(&self.transactions_processed),
            pools_found: load(&self.pools_found),
            purchase_skips: load(&self.purchase_skips),
            classification_errors: load(&self.classification_errors),
            feed_errors: load(&self.feed_errors),
            trades_initiated,
            trades_succeeded,
            trades_failed,
            trades_abandoned,
            trades_in_flight: trades_initiated
                .saturating_sub(trades_succeeded + trades_failed + trades_abandoned),
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}
