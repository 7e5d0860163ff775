//! Mock executor for testing without a wallet or exchange.

use super::{ExecutionError, SwapOrder, TradeExecutor};
use crate::domain::TxHash;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Mock executor that records every order it receives.
///
/// Orders succeed with a synthetic hash unless a scripted failure is queued.
#[derive(Debug, Default)]
pub struct MockTradeExecutor {
    orders: Mutex<Vec<SwapOrder>>,
    failures: Mutex<VecDeque<ExecutionError>>,
    delay: Option<Duration>,
}

impl MockTradeExecutor {
    /// Create a new mock executor that accepts every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next unscripted submission with `error`.
    pub fn with_failure(self, error: ExecutionError) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(error);
        }
        self
    }

    /// Wait `delay` before settling each submission.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Orders received so far, in submission order.
    pub fn orders(&self) -> Vec<SwapOrder> {
        self.orders.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn submission_count(&self) -> usize {
        self.orders.lock().map(|o| o.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TradeExecutor for MockTradeExecutor {
    async fn submit(&self, order: SwapOrder) -> Result<TxHash, ExecutionError> {
        let sequence = {
            let mut orders = self
                .orders
                .lock()
                .map_err(|e| ExecutionError::Rejected(e.to_string()))?;
            orders.push(order.clone());
            orders.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failures
            .lock()
            .map_err(|e| ExecutionError::Rejected(e.to_string()))?
            .pop_front();
        match failure {
            Some(err) => Err(err),
            None => Ok(TxHash::new(format!("mock-{}-{}", sequence, order.asset_out))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetUnit, Lovelace};
    use tokio_test::{assert_err, assert_ok};

    fn order() -> SwapOrder {
        SwapOrder::exact_in(Lovelace::new(1_000_000), AssetUnit::new("unit".to_string()))
    }

    #[tokio::test]
    async fn test_mock_executor_records_orders() {
        let executor = MockTradeExecutor::new();
        let hash = assert_ok!(executor.submit(order()).await);
        assert_eq!(hash.as_str(), "mock-1-unit");
        assert_eq!(executor.orders(), vec![order()]);
    }

    #[tokio::test]
    async fn test_mock_executor_scripted_failure_then_success() {
        let executor = MockTradeExecutor::new().with_failure(ExecutionError::RateLimited);
        let err = assert_err!(executor.submit(order()).await);
        assert_eq!(err, ExecutionError::RateLimited);
        assert_ok!(executor.submit(order()).await);
        assert_eq!(executor.submission_count(), 2);
    }
}
