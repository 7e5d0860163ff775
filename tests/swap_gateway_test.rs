use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use poolsniper::config::Network;
use poolsniper::{AssetUnit, ExecutionError, Lovelace, SwapGatewayExecutor, SwapOrder, TradeExecutor};
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake gateway saw, and what it answers with.
#[derive(Clone)]
struct Gateway {
    requests: Arc<Mutex<Vec<(HeaderMap, serde_json::Value)>>>,
    status: StatusCode,
    reply: serde_json::Value,
    delay: Duration,
}

async fn exact_in(
    State(gateway): State<Gateway>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    gateway.requests.lock().unwrap().push((headers, body));
    tokio::time::sleep(gateway.delay).await;
    (gateway.status, Json(gateway.reply.clone()))
}

async fn spawn_gateway(status: StatusCode, reply: serde_json::Value) -> (String, Gateway) {
    spawn_slow_gateway(status, reply, Duration::ZERO).await
}

async fn spawn_slow_gateway(
    status: StatusCode,
    reply: serde_json::Value,
    delay: Duration,
) -> (String, Gateway) {
    let gateway = Gateway {
        requests: Arc::new(Mutex::new(Vec::new())),
        status,
        reply,
        delay,
    };
    let app = Router::new()
        .route("/orders/exact-in", post(exact_in))
        .with_state(gateway.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), gateway)
}

fn executor(base_url: String) -> SwapGatewayExecutor {
    SwapGatewayExecutor::new(
        base_url,
        Network::Preprod,
        SecretString::from("test seed words".to_string()),
        SecretString::from("preprodKEY".to_string()),
    )
    .unwrap()
}

fn order() -> SwapOrder {
    SwapOrder::exact_in(
        Lovelace::new(1_000_000),
        AssetUnit::new("a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c2355350494359".to_string()),
    )
}

#[tokio::test]
async fn test_submit_returns_gateway_hash() {
    let (url, gateway) =
        spawn_gateway(StatusCode::OK, serde_json::json!({"tx_hash": "abc123"})).await;

    let hash = executor(url).submit(order()).await.unwrap();
    assert_eq!(hash.as_str(), "abc123");

    let requests = gateway.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers.get("project_id").unwrap(), "preprodKEY");
    assert_eq!(body["network"], "preprod");
    assert_eq!(body["wallet_seed"], "test seed words");
    assert_eq!(body["asset_in"]["unit"], "lovelace");
    assert_eq!(body["asset_in"]["quantity"], 1_000_000);
    assert_eq!(
        body["asset_out"],
        "a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c2355350494359"
    );
    assert_eq!(body["minimum_amount_out"], 1);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let (url, gateway) = spawn_gateway(
        StatusCode::BAD_REQUEST,
        serde_json::json!({"error": "insufficient funds"}),
    )
    .await;

    let err = executor(url).submit(order()).await.unwrap_err();
    match err {
        ExecutionError::Http { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("insufficient funds"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
    assert_eq!(gateway.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_not_resent() {
    let (url, gateway) =
        spawn_gateway(StatusCode::BAD_GATEWAY, serde_json::json!({"error": "upstream"})).await;

    let err = executor(url).submit(order()).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Http { status: 502, .. }));
    assert_eq!(gateway.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_hash_is_rejected() {
    let (url, _gateway) =
        spawn_gateway(StatusCode::OK, serde_json::json!({"tx_hash": null})).await;

    let err = executor(url).submit(order()).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Rejected(_)));
}

#[tokio::test]
async fn test_hung_gateway_times_out_as_network_error() {
    let (url, gateway) = spawn_slow_gateway(
        StatusCode::OK,
        serde_json::json!({"tx_hash": "late"}),
        Duration::from_secs(30),
    )
    .await;
    let impatient = executor(url)
        .with_request_timeout(Duration::from_millis(200))
        .unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), impatient.submit(order()))
        .await
        .expect("submission should give up after the request timeout");

    match result {
        Err(ExecutionError::Network(message)) => assert!(message.contains("timed out")),
        other => panic!("Expected Network error, got {:?}", other),
    }
    assert_eq!(gateway.requests.lock().unwrap().len(), 1);
}
