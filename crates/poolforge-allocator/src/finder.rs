//! The server finder: one allocation per pool, remembered forever.
//!
//! # Concurrency note
//!
//! Each pool id gets its own `OnceCell` slot. The map of slots sits behind
//! a mutex that is held only long enough to fetch or insert a slot, never
//! across the allocation request. Concurrent lookups for the same pool wait
//! on that pool's slot, so at most one request is in flight per pool;
//! lookups for different pools proceed in parallel. A failed allocation
//! leaves the slot empty and the next lookup retries.

use std::collections::HashMap;
use std::sync::Arc;

use poolforge_protocol::PoolId;
use tokio::sync::{Mutex, OnceCell};

use crate::{AllocationError, Allocator, Endpoint};

/// Memoizing front for an [`Allocator`], keyed by pool id.
///
/// Entries are never evicted: pool ids are never reused, so an entry is
/// valid for the life of the process.
pub struct ServerFinder<A: Allocator> {
    allocator: A,
    slots: Mutex<HashMap<PoolId, Arc<OnceCell<Endpoint>>>>,
}

impl<A: Allocator> ServerFinder<A> {
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the endpoint for `pool_id`, allocating one on first use.
    ///
    /// # Errors
    /// Whatever the allocator reported. Errors are not cached.
    pub async fn resolve(&self, pool_id: PoolId) -> Result<Endpoint, AllocationError> {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(pool_id).or_default())
        };

        let endpoint = slot
            .get_or_try_init(|| async {
                tracing::info!(%pool_id, "allocating game server");
                let result = self.allocator.allocate().await;
                match &result {
                    Ok(endpoint) => tracing::info!(
                        %pool_id,
                        host = %endpoint.host,
                        port = endpoint.port,
                        "game server allocated"
                    ),
                    Err(e) => tracing::warn!(
                        %pool_id,
                        error = %e,
                        "game server allocation failed"
                    ),
                }
                result
            })
            .await?;

        Ok(endpoint.clone())
    }

    /// Returns the cached endpoint without allocating.
    pub async fn cached(&self, pool_id: PoolId) -> Option<Endpoint> {
        let slots = self.slots.lock().await;
        slots.get(&pool_id).and_then(|slot| slot.get().cloned())
    }

    /// Number of pools with a cached endpoint.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}
