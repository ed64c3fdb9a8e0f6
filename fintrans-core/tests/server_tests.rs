//! Integration tests for the mock processor HTTP service
//!
//! Each test binds the router to a loopback port and talks to it over real
//! HTTP, both with raw requests and through the `HttpProcessor` client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode as AxumStatus;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use fintrans_core::adapters::{HttpProcessor, MemoryStore};
use fintrans_core::ports::TransferProcessor;
use fintrans_core::server::{self, ServerConfig};
use fintrans_core::services::{ProfileStore, TransactionLogStore, WalletService};
use fintrans_core::{Error, TransactionRecord, TransactionStatus};

// ============================================================================
// Test Helpers
// ============================================================================

async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Processor service with a short delay
async fn spawn_processor() -> SocketAddr {
    let config = ServerConfig {
        delay: Duration::from_millis(20),
        failure_threshold: Decimal::from(5000),
    };
    spawn_router(server::router(config)).await
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

fn wallet_for(processor: Arc<dyn TransferProcessor>, balance: i64) -> WalletService {
    let store = Arc::new(MemoryStore::new());
    let profiles = ProfileStore::new(store.clone());
    let profile = profiles
        .sign_in("Tester", "", Decimal::from(balance))
        .unwrap();
    WalletService::open(profile, profiles, TransactionLogStore::new(store), processor).unwrap()
}

// ============================================================================
// Raw HTTP contract
// ============================================================================

#[tokio::test]
async fn test_post_decides_by_threshold() {
    let addr = spawn_processor().await;
    let client = reqwest::Client::new();

    for (amount, expected) in [
        (json!(200), "completed"),
        (json!(5000), "completed"),
        (json!(6000), "failed"),
        (json!("5000.01"), "failed"),
        (json!("12.34"), "completed"),
    ] {
        let response = client
            .post(url(addr, "/api/transactions"))
            .json(&json!({ "userId": "u1", "tx": { "id": "t1", "amount": amount } }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "status": expected }), "amount {amount}");
    }
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let addr = spawn_processor().await;
    let client = reqwest::Client::new();

    for request in [
        client.get(url(addr, "/api/transactions")),
        client.put(url(addr, "/api/transactions")),
        client.delete(url(addr, "/api/transactions")),
    ] {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn test_uninterpretable_bodies_are_server_errors() {
    let addr = spawn_processor().await;
    let client = reqwest::Client::new();

    for body in [
        "not json".to_string(),
        json!({ "userId": "u1" }).to_string(),
    ] {
        let response = client
            .post(url(addr, "/api/transactions"))
            .header("content-type", "application/json")
            .body(body.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "{body}"
        );
        let payload: Value = response.json().await.unwrap();
        assert_eq!(payload, json!({ "error": "server error" }));
    }
}

#[tokio::test]
async fn test_non_numeric_amounts_complete() {
    let addr = spawn_processor().await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "tx": { "amount": "lots" } }),
        json!({ "tx": { "amount": null } }),
        json!({ "tx": { "id": "x" } }),
    ] {
        let response = client
            .post(url(addr, "/api/transactions"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK, "{body}");
        let payload: Value = response.json().await.unwrap();
        assert_eq!(payload, json!({ "status": "completed" }));
    }
}

#[tokio::test]
async fn test_health() {
    let addr = spawn_processor().await;
    let body: Value = reqwest::get(url(addr, "/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_delay_is_applied() {
    let config = ServerConfig {
        delay: Duration::from_millis(200),
        failure_threshold: Decimal::from(5000),
    };
    let addr = spawn_router(server::router(config)).await;

    let started = std::time::Instant::now();
    reqwest::Client::new()
        .post(url(addr, "/api/transactions"))
        .json(&json!({ "tx": { "amount": 1 } }))
        .send()
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(200));
}

// ============================================================================
// HttpProcessor client against the service
// ============================================================================

#[tokio::test]
async fn test_http_processor_decisions() {
    let addr = spawn_processor().await;
    let processor = HttpProcessor::new(&format!("http://{}", addr));

    let small = TransactionRecord::outgoing("Alice", Decimal::from(200));
    assert_eq!(
        processor.process("u1", &small).await.unwrap(),
        TransactionStatus::Completed
    );

    let large = TransactionRecord::outgoing("Carl", Decimal::from(6000));
    assert_eq!(
        processor.process("u1", &large).await.unwrap(),
        TransactionStatus::Failed
    );
}

#[tokio::test]
async fn test_wallet_over_http_keeps_deduction_on_decline() {
    let addr = spawn_processor().await;
    let wallet = wallet_for(
        Arc::new(HttpProcessor::new(&format!("http://{}", addr))),
        10000,
    );

    let outcome = wallet.submit("Carl", "6000").await.unwrap();
    assert_eq!(outcome.record.status, TransactionStatus::Failed);
    assert!(!outcome.rolled_back);
    assert_eq!(wallet.balance(), Decimal::from(4000));

    let outcome = wallet.submit("Alice", "200").await.unwrap();
    assert_eq!(outcome.record.status, TransactionStatus::Completed);
    assert_eq!(wallet.balance(), Decimal::from(3800));
}

#[tokio::test]
async fn test_server_error_reply_rolls_back() {
    let broken = Router::new().route(
        "/api/transactions",
        post(|| async {
            (
                AxumStatus::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "server error" })),
            )
        }),
    );
    let addr = spawn_router(broken).await;
    let processor = HttpProcessor::new(&format!("http://{}", addr));

    let tx = TransactionRecord::outgoing("Alice", Decimal::from(200));
    let err = processor.process("u1", &tx).await.unwrap_err();
    assert!(matches!(err, Error::Processor(_)));
    assert!(err.to_string().contains("500"));

    let wallet = wallet_for(Arc::new(processor), 1000);
    let outcome = wallet.submit("Alice", "200").await.unwrap();
    assert_eq!(outcome.record.status, TransactionStatus::Failed);
    assert!(outcome.rolled_back);
    assert_eq!(wallet.balance(), Decimal::from(1000));
}

#[tokio::test]
async fn test_reply_without_status_rolls_back() {
    let odd = Router::new().route(
        "/api/transactions",
        post(|| async { Json(json!({ "ok": true })) }),
    );
    let addr = spawn_router(odd).await;
    let wallet = wallet_for(
        Arc::new(HttpProcessor::new(&format!("http://{}", addr))),
        1000,
    );

    let outcome = wallet.submit("Alice", "200").await.unwrap();
    assert_eq!(outcome.record.status, TransactionStatus::Failed);
    assert!(outcome.rolled_back);
    assert_eq!(wallet.balance(), Decimal::from(1000));
}
