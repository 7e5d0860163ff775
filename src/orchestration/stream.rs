//! The driving loop: fetch, deduplicate, classify, decide, trade.

use crate::domain::{AssetUnit, Transaction, TxHash, TxId};
use crate::engine::{
    evaluate, extract_listed_asset, find_pool_output, ClassificationError, DedupWindow,
    NoTradeReason, PurchaseLedger, StrategyParams, TradeVerdict,
};
use crate::executor::{ExecutionError, SwapOrder, TradeExecutor};
use crate::feed::{FeedError, TransactionFeed};
use crate::orchestration::PipelineStats;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// How long shutdown waits for in-flight trades before abandoning them.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Settlement of one detached trade submission.
#[derive(Debug)]
pub struct TradeOutcome {
    pub dispatch_id: Uuid,
    pub order: SwapOrder,
    pub result: Result<TxHash, ExecutionError>,
}

/// What one fetch cycle did with its batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub duplicates: usize,
    pub processed: usize,
    pub trades_dispatched: usize,
}

/// Owns all cross-cycle state: the dedup window, the purchase ledger and the
/// set of in-flight trade submissions.
///
/// Both bounded records are only touched from the loop itself. Submissions run
/// as detached tasks; their outcomes are reaped at the start of each batch and
/// only then applied to the purchase ledger.
pub struct StreamLoop {
    feed: Arc<dyn TransactionFeed>,
    executor: Arc<dyn TradeExecutor>,
    params: StrategyParams,
    seen: DedupWindow,
    purchases: PurchaseLedger,
    in_flight: JoinSet<TradeOutcome>,
    dispatched: HashMap<Uuid, AssetUnit>,
    stats: Arc<PipelineStats>,
    feed_retry_delay: Duration,
    shutdown_grace: Duration,
}

impl StreamLoop {
    pub fn new(
        feed: Arc<dyn TransactionFeed>,
        executor: Arc<dyn TradeExecutor>,
        params: StrategyParams,
    ) -> Self {
        Self {
            feed,
            executor,
            params,
            seen: DedupWindow::with_default_capacity(),
            purchases: PurchaseLedger::with_default_capacity(),
            in_flight: JoinSet::new(),
            dispatched: HashMap::new(),
            stats: Arc::new(PipelineStats::new()),
            feed_retry_delay: Duration::from_secs(1),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    pub fn with_stats(mut self, stats: Arc<PipelineStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_feed_retry_delay(mut self, delay: Duration) -> Self {
        self.feed_retry_delay = delay;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    pub fn dedup_window(&self) -> &DedupWindow {
        &self.seen
    }

    pub fn purchase_ledger(&self) -> &PurchaseLedger {
        &self.purchases
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Run until `shutdown` turns true (or its sender is dropped).
    ///
    /// Shutdown is honoured between cycles and while waiting on the feed.
    /// Outstanding trade submissions get the shutdown grace period to settle;
    /// whatever is still running after that is aborted and logged.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Stream loop started");

        while !*shutdown.borrow() {
            // Only the fetch suspends inside a cycle, so dropping the cycle
            // future on shutdown never leaves a batch half-processed.
            let cycle = tokio::select! {
                _ = shutdown.changed() => None,
                result = self.run_cycle() => Some(result),
            };
            let Some(result) = cycle else {
                break;
            };

            match result {
                Ok(report) => debug!(
                    fetched = report.fetched,
                    duplicates = report.duplicates,
                    dispatched = report.trades_dispatched,
                    "Cycle complete"
                ),
                Err(e) => {
                    self.stats.record_feed_error();
                    error!("Feed error, retrying in {:?}: {}", self.feed_retry_delay, e);
                    let interrupted = tokio::select! {
                        _ = shutdown.changed() => true,
                        _ = tokio::time::sleep(self.feed_retry_delay) => false,
                    };
                    if interrupted {
                        break;
                    }
                }
            }
        }

        info!(in_flight = self.in_flight.len(), "Stream loop stopping");
        let grace = self.shutdown_grace;
        if tokio::time::timeout(grace, self.settle()).await.is_err() {
            self.abandon_in_flight().await;
        }
    }

    /// Fetch one batch and handle it.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, FeedError> {
        let batch = self.feed.fetch_transactions().await?;
        Ok(self.handle_batch(batch))
    }

    /// Claim and process a batch in delivery order.
    ///
    /// Each id is claimed in the dedup window before its transaction is
    /// processed, so an id is acted on at most once however often the feed
    /// repeats it.
    pub fn handle_batch(&mut self, batch: Vec<Transaction>) -> CycleReport {
        self.reap_finished();

        let mut report = CycleReport {
            fetched: batch.len(),
            ..Default::default()
        };
        self.stats.record_fetched(batch.len());

        for tx in batch {
            if !self.seen.record(tx.id.clone()) {
                report.duplicates += 1;
                self.stats.record_duplicate();
                continue;
            }

            report.processed += 1;
            self.stats.record_processed();
            match self.process_transaction(&tx) {
                Ok(Some(order)) => {
                    self.dispatch(&tx.id, order);
                    report.trades_dispatched += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    self.stats.record_classification_error();
                    error!(tx_id = %tx.id, "Error processing: {}", e);
                }
            }
            debug!(tx_id = %tx.id, "Processed");
        }

        report
    }

    fn process_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<Option<SwapOrder>, ClassificationError> {
        let Some(output) = find_pool_output(tx, &self.params) else {
            return Ok(None);
        };
        self.stats.record_pool_found();
        info!(tx_id = %tx.id, coins = %output.coins, "Found a pool");

        let unit = extract_listed_asset(output)?;

        match evaluate(&unit, output.coins, &self.purchases, &self.params) {
            TradeVerdict::Trade {
                amount_in,
                asset_out,
            } => Ok(Some(SwapOrder::exact_in(amount_in, asset_out))),
            TradeVerdict::NoTrade(NoTradeReason::AlreadyPurchased) => {
                self.stats.record_purchase_skip();
                info!(unit = %unit, "Skipping {} because we've already bought it before", unit);
                Ok(None)
            }
            TradeVerdict::NoTrade(reason) => {
                debug!(unit = %unit, coins = %output.coins, "Not trading: {}", reason);
                Ok(None)
            }
        }
    }

    fn dispatch(&mut self, tx_id: &TxId, order: SwapOrder) {
        let dispatch_id = Uuid::new_v4();
        let ticker = order
            .asset_out
            .ticker(self.params.policy_id_len)
            .unwrap_or_default();
        info!(
            %dispatch_id,
            tx_id = %tx_id,
            unit = %order.asset_out,
            ticker = %ticker,
            "Buying {} with an input of {}",
            order.asset_out,
            order.amount_in
        );
        self.stats.record_trade_initiated();
        self.dispatched.insert(dispatch_id, order.asset_out.clone());

        let executor = Arc::clone(&self.executor);
        let span = info_span!("trade", %dispatch_id, unit = %order.asset_out);
        self.in_flight.spawn(
            async move {
                let result = AssertUnwindSafe(executor.submit(order.clone()))
                    .catch_unwind()
                    .await
                    .unwrap_or(Err(ExecutionError::Panicked));
                match &result {
                    Ok(hash) => info!(tx_hash = %hash, "Trade submitted"),
                    Err(e) => error!("Trade failed: {}", e),
                }
                TradeOutcome {
                    dispatch_id,
                    order,
                    result,
                }
            }
            .instrument(span),
        );
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.in_flight.try_join_next() {
            self.apply_outcome(joined);
        }
    }

    /// Wait for every in-flight submission and apply its outcome.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            self.apply_outcome(joined);
        }
    }

    /// Abort every submission still running and log what was given up.
    async fn abandon_in_flight(&mut self) {
        self.in_flight.abort_all();
        while let Some(joined) = self.in_flight.join_next().await {
            self.apply_outcome(joined);
        }
        for (dispatch_id, unit) in self.dispatched.drain() {
            self.stats.record_trade_abandoned();
            warn!(%dispatch_id, unit = %unit, "Abandoned in-flight trade at shutdown");
        }
    }

    fn apply_outcome(&mut self, joined: Result<TradeOutcome, JoinError>) {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => return,
            Err(e) => {
                error!("Trade task failed to join: {}", e);
                return;
            }
        };
        self.dispatched.remove(&outcome.dispatch_id);

        match outcome.result {
            Ok(_) => {
                self.stats.record_trade_succeeded();
                self.purchases.record(outcome.order.asset_out);
            }
            Err(_) => {
                // Leave the asset eligible for a later qualifying pool.
                self.stats.record_trade_failed();
                debug!(
                    dispatch_id = %outcome.dispatch_id,
                    unit = %outcome.order.asset_out,
                    "Purchase not recorded"
                );
            }
        }
    }
}
