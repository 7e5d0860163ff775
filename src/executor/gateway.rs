//! HTTP client for an order-building and signing swap gateway.

use super::{ExecutionError, SwapOrder, TradeExecutor};
use crate::config::Network;
use crate::domain::TxHash;
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Unit name of the base currency in gateway orders.
const LOVELACE_UNIT: &str = "lovelace";

/// Upper bound on a single gateway request, connect to last body byte.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Submits exact-in swap orders to a gateway that builds, signs and submits
/// the exchange transaction with our wallet.
pub struct SwapGatewayExecutor {
    client: Client,
    base_url: String,
    network: Network,
    wallet_seed: SecretString,
    api_key: SecretString,
}

#[derive(Debug, Serialize)]
struct AssetAmount<'a> {
    unit: &'a str,
    quantity: u64,
}

#[derive(Serialize)]
struct ExactInOrderRequest<'a> {
    network: &'a str,
    wallet_seed: &'a str,
    asset_in: AssetAmount<'a>,
    asset_out: &'a str,
    minimum_amount_out: u64,
}

#[derive(Debug, Deserialize)]
struct ExactInOrderResponse {
    #[serde(default, alias = "txHash")]
    tx_hash: Option<String>,
}

impl SwapGatewayExecutor {
    pub fn new(
        base_url: String,
        network: Network,
        wallet_seed: SecretString,
        api_key: SecretString,
    ) -> Result<Self, ExecutionError> {
        Ok(Self {
            client: build_client(DEFAULT_REQUEST_TIMEOUT)?,
            base_url,
            network,
            wallet_seed,
            api_key,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ExecutionError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn orders_url(&self) -> String {
        format!("{}/orders/exact-in", self.base_url.trim_end_matches('/'))
    }

    async fn post_order(&self, order: &SwapOrder) -> Result<ExactInOrderResponse, ExecutionError> {
        let url = self.orders_url();
        let body = ExactInOrderRequest {
            network: self.network.as_str(),
            wallet_seed: self.wallet_seed.expose_secret(),
            asset_in: AssetAmount {
                unit: LOVELACE_UNIT,
                quantity: order.amount_in.as_u64(),
            },
            asset_out: order.asset_out.as_str(),
            minimum_amount_out: order.minimum_amount_out,
        };
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(10)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .post(&url)
                .header("project_id", self.api_key.expose_secret())
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    // Only a failed connect is known not to have reached the gateway.
                    if e.is_connect() {
                        backoff::Error::transient(ExecutionError::Network(e.to_string()))
                    } else if e.is_timeout() {
                        backoff::Error::permanent(ExecutionError::Network(format!(
                            "request timed out: {}",
                            e
                        )))
                    } else {
                        backoff::Error::permanent(ExecutionError::Network(e.to_string()))
                    }
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(ExecutionError::RateLimited));
            }
            if !status.is_success() {
                // 5xx may mean the order was already submitted; never resend.
                let message = response.text().await.unwrap_or_default();
                return Err(backoff::Error::permanent(ExecutionError::Http {
                    status: status.as_u16(),
                    message,
                }));
            }

            response
                .json::<ExactInOrderResponse>()
                .await
                .map_err(|e| backoff::Error::permanent(ExecutionError::Parse(e.to_string())))
        })
        .await
    }
}

fn build_client(timeout: Duration) -> Result<Client, ExecutionError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ExecutionError::Network(e.to_string()))
}

impl std::fmt::Debug for SwapGatewayExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapGatewayExecutor")
            .field("base_url", &self.base_url)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TradeExecutor for SwapGatewayExecutor {
    async fn submit(&self, order: SwapOrder) -> Result<TxHash, ExecutionError> {
        debug!(
            "Submitting exact-in order: {} for {}",
            order.amount_in, order.asset_out
        );

        let response = self.post_order(&order).await?;
        match response.tx_hash {
            Some(hash) if !hash.trim().is_empty() => Ok(TxHash::new(hash)),
            _ => Err(ExecutionError::Rejected(
                "gateway returned no transaction hash".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(base_url: &str) -> SwapGatewayExecutor {
        SwapGatewayExecutor::new(
            base_url.to_string(),
            Network::Mainnet,
            SecretString::from("seed words".to_string()),
            SecretString::from("mainnetKEY".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_orders_url_trims_trailing_slash() {
        assert_eq!(
            executor("http://localhost:8090/").orders_url(),
            "http://localhost:8090/orders/exact-in"
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", executor("http://localhost:8090"));
        assert!(!rendered.contains("seed words"));
        assert!(!rendered.contains("mainnetKEY"));
    }

    #[test]
    fn test_request_serialization() {
        let body = ExactInOrderRequest {
            network: "mainnet",
            wallet_seed: "seed",
            asset_in: AssetAmount {
                unit: LOVELACE_UNIT,
                quantity: 1_000_000,
            },
            asset_out: "abc5350494359",
            minimum_amount_out: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["asset_in"]["unit"], "lovelace");
        assert_eq!(json["asset_in"]["quantity"], 1_000_000);
        assert_eq!(json["asset_out"], "abc5350494359");
        assert_eq!(json["minimum_amount_out"], 1);
    }

    #[test]
    fn test_response_accepts_camel_case_hash() {
        let response: ExactInOrderResponse =
            serde_json::from_str(r#"{"txHash":"deadbeef"}"#).unwrap();
        assert_eq!(response.tx_hash.as_deref(), Some("deadbeef"));

        let response: ExactInOrderResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.tx_hash.is_none());
    }
}
