//! Integration tests for the `Matchmaking` service with a mock allocator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use poolforge::prelude::*;

// =========================================================================
// Mock allocator
// =========================================================================

/// Counts calls; fails while `failures_left` is non-zero.
#[derive(Default)]
struct MockAllocator {
    calls: AtomicUsize,
    failures_left: AtomicUsize,
}

impl MockAllocator {
    fn failing_once() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(1),
        }
    }
}

impl Allocator for MockAllocator {
    async fn allocate(&self) -> Result<Endpoint, AllocationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
        {
            return Err(AllocationError::Status(503));
        }
        Ok(Endpoint::new(format!("10.1.0.{n}"), 7000 + n as u16))
    }
}

const WAIT: Duration = Duration::from_secs(10);

fn service(capacity: usize, allocator: MockAllocator) -> Matchmaking<MockAllocator> {
    Matchmaking::new(PoolConfig::new(capacity, WAIT), allocator).unwrap()
}

fn calls(service: &Matchmaking<MockAllocator>) -> usize {
    service.finder().allocator().calls.load(Ordering::SeqCst)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_open_pool_has_no_server_and_no_allocation() {
    let svc = service(2, MockAllocator::default());

    let result = svc.join_pool(PlayerId(1)).await.unwrap();

    assert!(!result.is_full);
    assert_eq!(result.current_member_count, 1);
    assert_eq!(result.server(), None);
    assert_eq!(calls(&svc), 0);
}

#[tokio::test(start_paused = true)]
async fn test_filling_join_gets_server() {
    let svc = service(2, MockAllocator::default());
    svc.join_pool(PlayerId(1)).await.unwrap();

    let result = svc.join_pool(PlayerId(2)).await.unwrap();

    assert!(result.is_full);
    assert_eq!(result.server(), Some(("10.1.0.1", 7001)));
}

#[tokio::test(start_paused = true)]
async fn test_status_polls_reuse_one_allocation() {
    let svc = service(2, MockAllocator::default());
    let first = svc.join_pool(PlayerId(1)).await.unwrap();
    svc.join_pool(PlayerId(2)).await.unwrap();

    let a = svc.query_status(first.pool_id).await.unwrap();
    let b = svc.query_status(first.pool_id).await.unwrap();

    assert_eq!(a.server(), b.server());
    assert!(a.server().is_some());
    assert_eq!(calls(&svc), 1);
}

#[tokio::test(start_paused = true)]
async fn test_allocation_failure_reports_full_without_server_then_retries() {
    let svc = service(1, MockAllocator::failing_once());

    let joined = svc.join_pool(PlayerId(1)).await.unwrap();
    assert!(joined.is_full);
    assert_eq!(joined.server(), None);

    let polled = svc.query_status(joined.pool_id).await.unwrap();
    assert!(polled.is_full);
    assert_eq!(polled.server(), Some(("10.1.0.2", 7002)));
    assert_eq!(calls(&svc), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_pool_reports_timeout() {
    let svc = service(2, MockAllocator::default());
    let joined = svc.join_pool(PlayerId(1)).await.unwrap();

    tokio::time::sleep(WAIT * 2).await;
    let result = svc.query_status(joined.pool_id).await.unwrap();

    assert!(result.timed_out);
    assert!(!result.is_full);
    assert_eq!(result.server(), None);
    assert_eq!(calls(&svc), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_pool_is_error() {
    let svc = service(2, MockAllocator::default());

    let result = svc.query_status(PoolId(42)).await;

    assert!(matches!(
        result,
        Err(PoolforgeError::Pool(PoolError::UnknownPool(PoolId(42))))
    ));
}

#[tokio::test]
async fn test_register_player_is_independent_of_pools() {
    let svc = service(2, MockAllocator::default());

    let a = svc.register_player().await;
    let b = svc.register_player().await;

    assert_ne!(a, b);
    assert!(svc.players().is_registered(a).await);
    assert_eq!(svc.matchmaker().pool_count().await, 0);
}

#[test]
fn test_invalid_pool_config_is_rejected() {
    let result = Matchmaking::new(PoolConfig::new(0, WAIT), MockAllocator::default());
    assert!(matches!(result, Err(PoolforgeError::Pool(PoolError::InvalidConfig(_)))));
}
