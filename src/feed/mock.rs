//! Mock feed for testing without a node.

use super::{FeedError, TransactionFeed};
use crate::domain::Transaction;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock feed that replays scripted batches in order.
///
/// Once the script is exhausted the feed suspends forever, like a quiet
/// mempool.
#[derive(Debug, Default)]
pub struct MockTransactionFeed {
    script: Mutex<VecDeque<Result<Vec<Transaction>, FeedError>>>,
    fetches: AtomicUsize,
}

impl MockTransactionFeed {
    /// Create a new mock feed with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch to the script.
    pub fn with_batch(self, batch: Vec<Transaction>) -> Self {
        self.push(Ok(batch));
        self
    }

    /// Append a failing fetch to the script.
    pub fn with_error(self, error: FeedError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, item: Result<Vec<Transaction>, FeedError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }

    /// Number of times `fetch_transactions` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of scripted results not yet delivered.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TransactionFeed for MockTransactionFeed {
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .map_err(|e| FeedError::Protocol(e.to_string()))?
            .pop_front();
        match next {
            Some(item) => item,
            None => futures::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TxId;
    use std::time::Duration;

    fn tx(id: &str) -> Transaction {
        Transaction::new(TxId::new(id.to_string()), vec![])
    }

    #[tokio::test]
    async fn test_mock_feed_replays_script() {
        let feed = MockTransactionFeed::new()
            .with_batch(vec![tx("a"), tx("b")])
            .with_error(FeedError::Closed)
            .with_batch(vec![tx("c")]);

        assert_eq!(feed.fetch_transactions().await.unwrap().len(), 2);
        assert!(matches!(
            feed.fetch_transactions().await,
            Err(FeedError::Closed)
        ));
        assert_eq!(feed.fetch_transactions().await.unwrap()[0].id.as_str(), "c");
        assert_eq!(feed.fetch_count(), 3);
        assert_eq!(feed.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_feed_suspends_when_exhausted() {
        let feed = MockTransactionFeed::new();
        let result =
            tokio::time::timeout(Duration::from_millis(20), feed.fetch_transactions()).await;
        assert!(result.is_err(), "exhausted feed should not resolve");
    }
}
