//! Integration tests for the HTTP layer against local servers.
//!
//! `httpmock` covers request shape and status handling. Retry timing uses a
//! small tokio responder so each attempt can answer differently.
//!
//! Run with:
//! ```bash
//! cargo test --test http_integration
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use httpmock::prelude::*;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use defituna_api::client::TunaClient;
use defituna_api::error::SdkError;
use defituna_api::http::{unwrap, ClientConfig, RequestEnvelope, RetryOn, TunaHttp};
use defituna_api::shared::{Address, Value};
use defituna_api::sse::{PoolSubscription, PoolSubscriptionTopic, SubscriptionPayload};

const SOL: &str = "So11111111111111111111111111111111111111112";
const POOL_A: &str = "Czfq3xZZDmsdGdUyrNLtRhGc47cXcZtLG4crryfu44zE";
const POOL_B: &str = "FwewVm8u6tFPGewAyHmWAqad9hmF7mvqxK4mJ7iNqqGC";
const USER: &str = "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ";

fn client_for(server: &MockServer) -> TunaClient {
    TunaClient::builder()
        .base_url(&server.base_url())
        .build()
        .unwrap()
}

// ─── Flaky responder ─────────────────────────────────────────────────────────

/// Answers the first `failures` connections with 500, then 200 with `body`.
/// Returns the base URL and the attempt counter.
async fn flaky_server(failures: usize, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let (status, body) = if n < failures {
                    ("500 Internal Server Error", r#"{"error":"boom"}"#)
                } else {
                    ("200 OK", body)
                };
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), attempts)
}

/// Accepts connections and reads the request, never answers.
async fn silent_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            read_request_head(&mut socket).await;
            held.push(socket);
        }
    });

    (format!("http://{}", addr), attempts)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

// ─── Retries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fail_fail_succeed_retries_with_backoff() {
    let (base, attempts) = flaky_server(2, r#"{"data":{"status":"ok"}}"#).await;
    let http = TunaHttp::new(ClientConfig::new(&base)).unwrap();

    let started = Instant::now();
    let value = unwrap(http.execute(RequestEnvelope::get("v1/health")).await).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(value.get("status").and_then(Value::as_str), Some("ok"));
    // First backoff is at least 100ms, the second at least double that.
    assert!(elapsed >= Duration::from_millis(300), "{:?}", elapsed);
}

#[tokio::test]
async fn test_retries_exhausted_surfaces_last_error() {
    let (base, attempts) = flaky_server(10, "{}").await;
    let mut config = ClientConfig::new(&base);
    config.http_retries = 1;
    let http = TunaHttp::new(config).unwrap();

    let err = http.execute(RequestEnvelope::get("v1/health")).await.unwrap_err();
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(err.status(), 500);
    assert_eq!(
        err.cause().and_then(|c| c.get("error")).and_then(Value::as_str),
        Some("boom")
    );
}

#[tokio::test]
async fn test_pre_cancelled_request_never_hits_the_network() {
    let (base, attempts) = flaky_server(0, "{}").await;
    let http = TunaHttp::new(ClientConfig::new(&base)).unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let err = http
        .execute(RequestEnvelope::get("v1/health").cancel_token(token))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Aborted { .. }));
    assert_eq!(err.status(), 0);
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_ends_the_call_after_one_attempt() {
    let (base, attempts) = silent_server().await;
    let http = TunaHttp::new(ClientConfig::new(&base)).unwrap();

    let started = Instant::now();
    let err = http
        .execute(RequestEnvelope::get("v1/mints").timeout(Duration::from_millis(200)))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Timeout { after_ms: 200 }), "{:?}", err);
    assert_eq!(err.status(), 0);
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cancel_during_backoff_rejects_promptly() {
    let (base, attempts) = flaky_server(10, "{}").await;
    let http = TunaHttp::new(ClientConfig::new(&base)).unwrap();

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = http
        .execute(RequestEnvelope::get("v1/health").cancel_token(token))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, SdkError::Aborted { .. }), "{:?}", err);
    assert_eq!(
        err.cause().and_then(Value::as_str),
        Some("request cancelled by caller")
    );
    // The first backoff is at least 100ms; cancelling must not wait it out.
    assert!(elapsed < Duration::from_millis(100), "{:?}", elapsed);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_network_error_has_status_zero() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ClientConfig::new(&format!("http://{}", addr));
    config.http_retries = 0;
    let http = TunaHttp::new(config).unwrap();

    let err = http.execute(RequestEnvelope::get("v1/mints")).await.unwrap_err();
    assert!(matches!(err, SdkError::Network { .. }));
    assert_eq!(err.status(), 0);
    assert!(err.cause().and_then(Value::as_str).is_some());
}

// ─── Status handling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bad_request_is_api_error_with_cause() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/mints/bad");
            then.status(400)
                .json_body(json!({"error": "invalid mint", "error_code": 17}));
        })
        .await;

    let client = TunaClient::builder()
        .base_url(&server.base_url())
        .retry_on(RetryOn::TransientOnly)
        .build()
        .unwrap();

    let err = client.mints().get("bad").await.unwrap_err();
    mock.assert_hits_async(1).await;

    assert_eq!(err.status(), 400);
    let cause = err.cause().unwrap();
    assert_eq!(cause.get("error").and_then(Value::as_str), Some("invalid mint"));
    // Error bodies are normalized like any other payload.
    assert!(cause.get("errorCode").is_some());
}

#[tokio::test]
async fn test_throw_on_error_false_returns_failure_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/missing");
            then.status(404).json_body(json!({"message": "not found"}));
        })
        .await;

    let mut config = ClientConfig::new(&server.base_url());
    config.http_retries = 0;
    config.throw_on_error = false;
    let http = TunaHttp::new(config).unwrap();

    let response = http.execute(RequestEnvelope::get("v1/missing")).await.unwrap();
    assert_eq!(response.status, 404);
    assert!(response.data.is_none());
    assert_eq!(
        response
            .error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str),
        Some("not found")
    );
}

#[tokio::test]
async fn test_no_content_unwraps_to_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/empty");
            then.status(204);
        })
        .await;

    let http = TunaHttp::new(ClientConfig::new(&server.base_url())).unwrap();
    let response = http.execute(RequestEnvelope::get("v1/empty")).await.unwrap();
    assert_eq!(response.status, 204);
    assert!(response.data.is_none());
    assert!(unwrap(Ok(response)).unwrap().is_null());
}

// ─── Request and response normalization ──────────────────────────────────────

#[tokio::test]
async fn test_mints_are_normalized_and_typed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/mints");
            then.status(200).json_body(json!({
                "data": [{
                    "mint": SOL,
                    "symbol": "SOL",
                    "name": "Wrapped SOL",
                    "logo": "",
                    "decimals": 9
                }]
            }));
        })
        .await;

    let mints = client_for(&server).mints().all().await.unwrap();
    assert_eq!(mints.len(), 1);
    assert_eq!(mints[0].mint, Address::new(SOL));
    assert_eq!(mints[0].decimals, 9);
}

#[tokio::test]
async fn test_array_query_is_comma_joined() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/users/{}/limit-orders", USER))
                .query_param("pool", format!("{},{}", POOL_A, POOL_B));
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let listing = client_for(&server)
        .orders()
        .limit_orders(USER, &[Address::new(POOL_A), Address::new(POOL_B)])
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(listing.items.is_empty());
}

#[tokio::test]
async fn test_subscription_body_is_snake_cased() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/v1/streams/abc/subscription")
                .header("content-type", "application/json")
                .json_body(json!({
                    "pools": [{
                        "address": POOL_A,
                        "topics": ["order_book"],
                        "order_book_price_step": 0.5,
                        "is_inverted": false
                    }]
                }));
            then.status(200).json_body(json!({"data": {"status": "ok"}}));
        })
        .await;

    let payload = SubscriptionPayload::new().pool(
        PoolSubscription::new(Address::new(POOL_A), &[PoolSubscriptionTopic::OrderBook])
            .order_book(0.5, false),
    );
    let result = client_for(&server)
        .update_stream_subscription("abc", &payload)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.status, "ok");
}

#[tokio::test]
async fn test_client_headers_are_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/mints").header("x-api-key", "secret");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let client = TunaClient::builder()
        .base_url(&server.base_url())
        .header("x-api-key", "secret")
        .build()
        .unwrap();

    let mints = client.mints().all().await.unwrap();
    mock.assert_async().await;
    assert!(mints.is_empty());
}

// ─── Market cache ────────────────────────────────────────────────────────────

fn wire_market(max_leverage: f64) -> serde_json::Value {
    let amount = json!({"amount": "0", "usd": 0.0});
    json!({
        "data": {
            "address": POOL_A,
            "max_leverage": max_leverage,
            "borrowed_funds_a": amount,
            "borrowed_funds_b": amount,
            "borrow_limit_a": amount,
            "borrow_limit_b": amount
        }
    })
}

#[tokio::test]
async fn test_market_cache_serves_repeat_gets() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/markets/{}", POOL_A));
            then.status(200).json_body(wire_market(5.0));
        })
        .await;

    let client = client_for(&server);
    let first = client.markets().get(POOL_A).await.unwrap();
    let second = client.markets().get(POOL_A).await.unwrap();

    mock.assert_hits_async(1).await;
    assert_eq!(first, second);
    assert_eq!(second.max_leverage, 5.0);

    client.markets().invalidate(POOL_A).await;
    client.markets().get(POOL_A).await.unwrap();
    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_market_cache_entries_expire() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/markets/{}", POOL_A));
            then.status(200).json_body(wire_market(5.0));
        })
        .await;

    let client = TunaClient::builder()
        .base_url(&server.base_url())
        .market_cache_ttl(Duration::from_millis(50))
        .build()
        .unwrap();

    client.markets().get(POOL_A).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    client.markets().get(POOL_A).await.unwrap();

    mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_base_url_switch_drops_cached_markets() {
    let server_a = MockServer::start_async().await;
    let server_b = MockServer::start_async().await;
    server_a
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/markets/{}", POOL_A));
            then.status(200).json_body(wire_market(5.0));
        })
        .await;
    let mock_b = server_b
        .mock_async(|when, then| {
            when.method(GET).path(format!("/v1/markets/{}", POOL_A));
            then.status(200).json_body(wire_market(99.0));
        })
        .await;

    let client = client_for(&server_a);
    assert_eq!(client.markets().get(POOL_A).await.unwrap().max_leverage, 5.0);

    client.set_base_url(&server_b.base_url()).await;
    assert_eq!(client.markets().get(POOL_A).await.unwrap().max_leverage, 99.0);
    mock_b.assert_hits_async(1).await;

    // A full config swap clears the cache too.
    client.set_config(ClientConfig::new(&server_b.base_url())).await;
    client.markets().get(POOL_A).await.unwrap();
    mock_b.assert_hits_async(2).await;
}

// ─── Candles and stats ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_pool_candles_query_and_decode() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1/pools/{}/candles", POOL_A))
                .query_param("from", "2025-06-01T00:00:00.000Z")
                .query_param("to", "2025-06-02T00:00:00.000Z")
                .query_param("candles", "24")
                .query_param("interval", "1h");
            then.status(200).json_body(json!({
                "data": [{
                    "time": 1748736000000u64,
                    "open": 150.0, "close": 151.5, "high": 152.0, "low": 149.0,
                    "volume": 12000.5
                }]
            }));
        })
        .await;

    let from = "2025-06-01T00:00:00Z".parse().unwrap();
    let to = "2025-06-02T00:00:00Z".parse().unwrap();
    let candles = client_for(&server)
        .pools()
        .candles(POOL_A, from, to, "1h", 24)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(candles.len(), 1);
    assert_eq!(candles[0].time, 1748736000000);
    assert_eq!(candles[0].close, 151.5);
}

#[tokio::test]
async fn test_fees_stats_query_and_decode() {
    let fields = [
        "add_liquidity_fees",
        "limit_order_fees",
        "yield_compounding_fees",
        "liquidation_fees",
        "total_liquidations_network_fees",
        "total_limit_orders_network_fees",
        "total_yield_compounding_network_fees",
        "failed_network_fees",
        "processed_network_fees",
        "total_collected_fees",
        "total_network_fees",
        "jito_liquidation_fees",
        "jito_limit_order_fees",
        "jito_yield_compounding_fees",
    ];
    let mut group = serde_json::Map::new();
    group.insert("time".into(), json!("2025-06-01T00:00:00Z"));
    for field in fields {
        group.insert(field.into(), json!(1.5));
        group.insert(format!("running_{}", field), json!(3.0));
    }

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/stats/fees")
                .query_param("from", "2025-06-01T00:00:00.000Z")
                .query_param("to", "2025-06-08T00:00:00.000Z")
                .query_param("interval", "1d");
            then.status(200).json_body(json!({"data": [group]}));
        })
        .await;

    let from = "2025-06-01T00:00:00Z".parse().unwrap();
    let to = "2025-06-08T00:00:00Z".parse().unwrap();
    let stats = client_for(&server)
        .stats()
        .fees(from, to, "1d")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].time.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    assert_eq!(stats[0].jito_limit_order_fees, 1.5);
    assert_eq!(stats[0].running_total_collected_fees, 3.0);
}

#[tokio::test]
async fn test_staking_revenue_uses_date_only_range() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/stats/staking/revenue")
                .query_param("from", "2025-01-01")
                .query_param("to", "2025-07-30");
            then.status(200).json_body(json!({
                "data": [{
                    "time": "2025-01-01T00:00:00Z",
                    "total_deposits_usd": 120.5,
                    "total_deposits_sol": "750000000",
                    "running_total_deposits_usd": 120.5,
                    "running_total_deposits_sol": "750000000"
                }]
            }));
        })
        .await;

    let from = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let to = chrono::NaiveDate::from_ymd_opt(2025, 7, 30).unwrap();
    let stats = client_for(&server)
        .stats()
        .staking_revenue(from, to)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_deposits_sol, 750_000_000);
}
