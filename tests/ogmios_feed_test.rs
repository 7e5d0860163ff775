use futures::{SinkExt, StreamExt};
use poolsniper::{FeedError, OgmiosFeed, TransactionFeed};
use serde_json::{json, Value};
use std::collections::VecDeque;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

fn response(method: &str, result: Value) -> Value {
    json!({
        "type": "jsonwsp/response",
        "version": "1.0",
        "servicename": "ogmios",
        "methodname": method,
        "result": result,
        "reflection": { "method": method },
    })
}

fn mempool_tx(id: &str, coins: u64) -> Value {
    json!({
        "id": id,
        "body": {
            "outputs": [
                {
                    "address": "addr1qx...",
                    "value": {
                        "coins": coins,
                        "assets": {
                            "0be55d262b29f564998ff81efe21bdc0022621c12f15af08d0f2ddb1.9f3c": 1,
                            "13aa2accf2e1561723aa26871e071fdf32c867cff7e7d50ad470d62f.4d494e53574150": 1,
                            "a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235.5350494359": 21000000000u64
                        }
                    }
                }
            ]
        }
    })
}

/// Serve one connection, answering each acquire with the next snapshot.
async fn spawn_node(snapshots: Vec<Vec<Value>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let mut snapshots: VecDeque<VecDeque<Value>> =
            snapshots.into_iter().map(VecDeque::from).collect();
        let mut current = VecDeque::new();

        while let Some(Ok(msg)) = ws.next().await {
            let Message::Text(text) = msg else {
                continue;
            };
            let request: Value = serde_json::from_str(&text).unwrap();
            let reply = match request["methodname"].as_str() {
                Some("AwaitAcquire") => {
                    current = snapshots.pop_front().unwrap_or_default();
                    response("AwaitAcquire", json!({ "AwaitAcquired": { "slot": 42 } }))
                }
                Some("NextTx") => {
                    assert_eq!(request["args"]["fields"], "all");
                    response("NextTx", current.pop_front().unwrap_or(Value::Null))
                }
                _ => json!({
                    "type": "jsonwsp/fault",
                    "fault": { "code": "client", "string": "unknown method" }
                }),
            };
            ws.send(Message::Text(reply.to_string())).await.unwrap();
        }
    });

    format!("ws://{}", addr)
}

#[tokio::test]
async fn test_fetch_drains_one_snapshot_per_call() {
    let url = spawn_node(vec![
        vec![mempool_tx("tx-a", 400_000_000_000), mempool_tx("tx-b", 2_000_000)],
        vec![mempool_tx("tx-a", 400_000_000_000)],
    ])
    .await;
    let feed = OgmiosFeed::new(url);

    let first = feed.fetch_transactions().await.unwrap();
    let ids: Vec<_> = first.iter().map(|tx| tx.id.as_str()).collect();
    assert_eq!(ids, vec!["tx-a", "tx-b"]);

    let assets: Vec<_> = first[0].outputs[0]
        .asset_ids()
        .map(|a| a.policy_id().to_string())
        .collect();
    assert_eq!(
        assets,
        vec![
            "0be55d262b29f564998ff81efe21bdc0022621c12f15af08d0f2ddb1",
            "13aa2accf2e1561723aa26871e071fdf32c867cff7e7d50ad470d62f",
            "a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235",
        ]
    );

    // The node still holds tx-a; the feed redelivers it.
    let second = feed.fetch_transactions().await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id.as_str(), "tx-a");
}

#[tokio::test]
async fn test_malformed_transaction_is_skipped() {
    let url = spawn_node(vec![vec![
        json!({ "id": "broken" }),
        mempool_tx("tx-ok", 2_000_000),
    ]])
    .await;
    let feed = OgmiosFeed::new(url);

    let batch = feed.fetch_transactions().await.unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].id.as_str(), "tx-ok");
}

#[tokio::test]
async fn test_unreachable_node_is_connection_error() {
    // Bind then drop to get a port nobody is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let feed = OgmiosFeed::new(format!("ws://{}", addr));
    assert!(matches!(
        feed.fetch_transactions().await,
        Err(FeedError::Connection(_))
    ));
}
