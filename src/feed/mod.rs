//! Transaction feed abstraction for pulling unconfirmed ledger transactions.

use crate::domain::Transaction;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod ogmios;

pub use mock::MockTransactionFeed;
pub use ogmios::OgmiosFeed;

/// Source of ledger transactions.
///
/// Delivery is at-least-once with best-effort ordering: the same transaction
/// may show up in several batches. Implementations own their reconnection.
#[async_trait]
pub trait TransactionFeed: Send + Sync + fmt::Debug {
    /// Fetch the next batch of transactions.
    ///
    /// May suspend until the source has something new. An empty batch is
    /// not an error.
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, FeedError>;
}

/// Error type for feed operations.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// Could not reach the source (DNS, TCP, TLS, handshake).
    #[error("Connection error: {0}")]
    Connection(String),
    /// The source closed the stream.
    #[error("Feed closed")]
    Closed,
    /// The source answered with a fault or an unexpected message.
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// A message could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_display() {
        let err = FeedError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection error: refused");

        assert_eq!(FeedError::Closed.to_string(), "Feed closed");

        let err = FeedError::Protocol("fault".to_string());
        assert_eq!(err.to_string(), "Protocol error: fault");

        let err = FeedError::Parse("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");
    }
}
