//! End-to-end tests for the HTTP adapter.

use std::time::Duration;

use poolforge::prelude::*;
use reqwest::StatusCode;
use serde_json::Value;

// =========================================================================
// Fixtures
// =========================================================================

struct FixedAllocator;

impl Allocator for FixedAllocator {
    async fn allocate(&self) -> Result<Endpoint, AllocationError> {
        Ok(Endpoint::new("10.9.9.9", 7777))
    }
}

/// Starts a server on an ephemeral port and returns its base URL.
async fn start(capacity: usize, wait: Duration) -> String {
    let service = Matchmaking::new(PoolConfig::new(capacity, wait), FixedAllocator).unwrap();
    let server = PoolforgeServerBuilder::new()
        .bind("127.0.0.1:0")
        .build(service)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    format!("http://{addr}")
}

async fn get(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_register_returns_player_id() {
    let base = start(2, Duration::from_secs(60)).await;

    let (status, body) = get(&format!("{base}/register")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["playerId"].is_u64());
}

#[tokio::test]
async fn test_join_and_poll_full_pool() {
    let base = start(2, Duration::from_secs(60)).await;

    let (status, first) = get(&format!("{base}/join?id=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["isFull"], false);
    assert_eq!(first["currentMemberCount"], 1);
    assert!(first.get("serverHost").is_none());

    let (_, second) = get(&format!("{base}/join?id=2")).await;
    assert_eq!(second["poolId"], first["poolId"]);
    assert_eq!(second["isFull"], true);
    assert_eq!(second["serverHost"], "10.9.9.9");
    assert_eq!(second["serverPort"], 7777);

    let pool_id = first["poolId"].as_u64().unwrap();
    let (status, polled) = get(&format!("{base}/match?id={pool_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled["isFull"], true);
    assert_eq!(polled["timedOut"], false);
    assert_eq!(polled["players"], serde_json::json!([1, 2]));
    assert_eq!(polled["serverPort"], 7777);
}

#[tokio::test]
async fn test_poll_timed_out_pool() {
    let base = start(2, Duration::from_millis(50)).await;

    let (_, joined) = get(&format!("{base}/join?id=5")).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let pool_id = joined["poolId"].as_u64().unwrap();
    let (status, polled) = get(&format!("{base}/match?id={pool_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled["timedOut"], true);
    assert_eq!(polled["isFull"], false);
}

#[tokio::test]
async fn test_unknown_pool_is_404() {
    let base = start(2, Duration::from_secs(60)).await;

    let (status, body) = get(&format!("{base}/match?id=12345")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_malformed_id_is_406() {
    let base = start(2, Duration::from_secs(60)).await;

    let (status, body) = get(&format!("{base}/join?id=abc")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert!(body["error"].is_string());

    let (status, _) = get(&format!("{base}/match")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}
