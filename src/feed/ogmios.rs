//! Ogmios mempool monitor over websocket (local-tx-monitor, JSON-WSP).

use super::{FeedError, TransactionFeed};
use crate::domain::{AssetId, Lovelace, Output, Transaction, TxId};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Mempool feed backed by an Ogmios node bridge.
///
/// Each fetch acquires a fresh mempool snapshot (suspending until the node
/// has one) and drains it with `NextTx`. The websocket is opened lazily and
/// dropped on any error, so the next fetch reconnects.
pub struct OgmiosFeed {
    url: String,
    connection: Mutex<Option<WsStream>>,
}

impl OgmiosFeed {
    pub fn new(url: String) -> Self {
        Self {
            url,
            connection: Mutex::new(None),
        }
    }

    async fn connect(&self) -> Result<WsStream, FeedError> {
        let (ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        info!("Connected to Ogmios at {}", self.url);
        Ok(ws)
    }

    async fn next_snapshot(ws: &mut WsStream) -> Result<Vec<Transaction>, FeedError> {
        let acquired = request(ws, "AwaitAcquire", json!({})).await?;
        debug!("Acquired mempool snapshot: {}", acquired);

        let mut batch = Vec::new();
        loop {
            let next = request(ws, "NextTx", json!({ "fields": "all" })).await?;
            if next.is_null() {
                break;
            }
            match parse_transaction(&next) {
                Ok(tx) => batch.push(tx),
                Err(e) => warn!("Skipping malformed mempool transaction: {}", e),
            }
        }

        Ok(batch)
    }
}

impl std::fmt::Debug for OgmiosFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OgmiosFeed").field("url", &self.url).finish()
    }
}

#[async_trait]
impl TransactionFeed for OgmiosFeed {
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>, FeedError> {
        let mut connection = self.connection.lock().await;
        if connection.is_none() {
            *connection = Some(self.connect().await?);
        }
        let Some(ws) = connection.as_mut() else {
            return Err(FeedError::Closed);
        };

        let result = Self::next_snapshot(ws).await;
        if result.is_err() {
            // Drop the socket; a half-read snapshot cannot be resumed.
            *connection = None;
        }
        result
    }
}

fn request_envelope(method: &str, args: Value) -> Value {
    json!({
        "type": "jsonwsp/request",
        "version": "1.0",
        "servicename": "ogmios",
        "methodname": method,
        "args": args,
        "mirror": { "method": method },
    })
}

/// Send one request and wait for its response's `result`.
async fn request(ws: &mut WsStream, method: &str, args: Value) -> Result<Value, FeedError> {
    let payload = request_envelope(method, args).to_string();
    ws.send(Message::Text(payload))
        .await
        .map_err(|e| FeedError::Connection(e.to_string()))?;

    while let Some(msg) = ws.next().await {
        let msg = msg.map_err(|e| FeedError::Connection(e.to_string()))?;
        match msg {
            Message::Text(text) => {
                let value: Value =
                    serde_json::from_str(&text).map_err(|e| FeedError::Parse(e.to_string()))?;
                return parse_response(&value, method);
            }
            Message::Close(_) => return Err(FeedError::Closed),
            _ => continue,
        }
    }

    Err(FeedError::Closed)
}

fn parse_response(value: &Value, method: &str) -> Result<Value, FeedError> {
    match value.get("type").and_then(|v| v.as_str()) {
        Some("jsonwsp/response") => {}
        Some("jsonwsp/fault") => {
            let reason = value
                .get("fault")
                .and_then(|f| f.get("string"))
                .and_then(|s| s.as_str())
                .unwrap_or("unknown fault");
            return Err(FeedError::Protocol(format!("{} failed: {}", method, reason)));
        }
        other => {
            return Err(FeedError::Protocol(format!(
                "unexpected message type {:?} for {}",
                other, method
            )))
        }
    }

    let answered = value.get("methodname").and_then(|v| v.as_str());
    if answered != Some(method) {
        return Err(FeedError::Protocol(format!(
            "expected response to {}, got {:?}",
            method, answered
        )));
    }

    value
        .get("result")
        .cloned()
        .ok_or_else(|| FeedError::Parse(format!("missing result for {}", method)))
}

pub(crate) fn parse_transaction(tx_json: &Value) -> Result<Transaction, FeedError> {
    let id = tx_json
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FeedError::Parse("Missing id field".to_string()))?;

    let outputs_json = tx_json
        .get("body")
        .and_then(|b| b.get("outputs"))
        .and_then(|o| o.as_array())
        .ok_or_else(|| FeedError::Parse(format!("Missing outputs for {}", id)))?;

    let outputs = outputs_json
        .iter()
        .map(parse_output)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Transaction::new(TxId::new(id.to_string()), outputs))
}

fn parse_output(output_json: &Value) -> Result<Output, FeedError> {
    let value = output_json
        .get("value")
        .ok_or_else(|| FeedError::Parse("Missing value field".to_string()))?;

    let coins = value
        .get("coins")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| FeedError::Parse("Missing coins field".to_string()))?;

    let mut assets = Vec::new();
    if let Some(assets_json) = value.get("assets").and_then(|v| v.as_object()) {
        for (asset, quantity) in assets_json {
            let quantity = quantity
                .as_u64()
                .ok_or_else(|| FeedError::Parse(format!("Invalid quantity for {}", asset)))?;
            assets.push((AssetId::new(asset.clone()), quantity));
        }
    }

    Ok(Output::new(Lovelace::new(coins), assets))
}
