//! Matchmaker: routes arriving players into pools and expires stale pools.
//!
//! # Locking
//!
//! Two kinds of lock exist: the registry lock (pool list, id index,
//! terminal index) and one lock per pool. They are only ever nested in
//! that order, registry then pool. Timer tasks take the pool lock,
//! release it, and only then take the registry lock. Nothing here holds
//! either lock across a sleep or network call.
//!
//! `join` does take pool locks while the registry lock is held. Scanning
//! and selecting a pool must be atomic with respect to other joins, and
//! reading a pool's membership needs that pool's lock, so the nesting
//! cannot be avoided. The alternative of never acquiring a pool lock
//! under the registry lock would let two joins pick the same last slot.
//! Because no path takes the registry lock while holding a pool lock,
//! the fixed order cannot deadlock.

use std::collections::HashMap;
use std::sync::Arc;

use poolforge_protocol::{PlayerId, PoolId};
use tokio::sync::Mutex;

use crate::{Admission, ExpiryOutcome, Pool, PoolConfig, PoolError, PoolSnapshot};

/// Everything the matchmaker shares between request tasks and timers.
struct Registry {
    /// Every pool ever created, in creation order (the scan order).
    pools: Vec<Arc<Pool>>,

    /// Same pools, keyed by id for status lookups.
    by_id: HashMap<PoolId, Arc<Pool>>,

    /// Final snapshots of pools that reached `Full` or `Expired`.
    terminal: HashMap<PoolId, PoolSnapshot>,

    next_id: u64,
}

impl Registry {
    fn new() -> Self {
        Self {
            pools: Vec::new(),
            by_id: HashMap::new(),
            terminal: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a fresh, empty pool. Applies nothing on failure.
    fn create_pool(&mut self, capacity: usize) -> Result<Arc<Pool>, PoolError> {
        let id = PoolId(self.next_id);
        let next_id = self.next_id.checked_add(1).ok_or_else(|| {
            PoolError::PoolCreationFailed("pool id space exhausted".into())
        })?;
        self.pools.try_reserve(1).map_err(|e| {
            PoolError::PoolCreationFailed(format!("cannot grow pool list: {e}"))
        })?;

        let pool = Arc::new(Pool::new(id, capacity));
        self.next_id = next_id;
        self.pools.push(Arc::clone(&pool));
        self.by_id.insert(id, Arc::clone(&pool));

        tracing::info!(pool_id = %id, capacity, "pool created");
        Ok(pool)
    }
}

/// Routes players into pools in arrival order.
///
/// `MatchMaker` is a cheap handle (`Arc` inside). Build one at startup and
/// clone it into every task that needs it.
///
/// ## Matching policy
///
/// ```text
/// join(p) ──→ scan pools in creation order
///               ├─ member of any pool     → return that pool (no change)
///               ├─ first pool with room   → add p there
///               └─ none                   → create a pool, add p
///         ──→ arm a wait timer for the pool (if still open)
/// ```
#[derive(Clone)]
pub struct MatchMaker {
    config: PoolConfig,
    registry: Arc<Mutex<Registry>>,
}

impl MatchMaker {
    /// Creates a matchmaker with no pools.
    ///
    /// # Errors
    /// [`PoolError::InvalidConfig`] if the capacity or wait is zero.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        Ok(Self {
            config: config.validated()?,
            registry: Arc::new(Mutex::new(Registry::new())),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Places `player_id` into a pool and returns that pool's snapshot.
    ///
    /// Re-joining a pool the player is already in returns its current
    /// snapshot unchanged. Must be called from within a Tokio runtime,
    /// since it spawns the pool's wait timer.
    ///
    /// # Errors
    /// [`PoolError::PoolCreationFailed`] if a new pool was needed and
    /// could not be registered.
    pub async fn join(&self, player_id: PlayerId) -> Result<PoolSnapshot, PoolError> {
        let mut registry = self.registry.lock().await;

        let mut selected = None;
        for pool in &registry.pools {
            match pool.try_admit(player_id).await {
                Admission::Duplicate(snapshot) => {
                    tracing::warn!(
                        %player_id,
                        pool_id = %snapshot.pool_id,
                        "player is trying to join twice"
                    );
                    return Ok(snapshot);
                }
                Admission::Admit => {
                    let snapshot = pool.add(player_id).await;
                    // An expiry timer may have closed the pool between the
                    // check and the add; keep scanning in that case.
                    if snapshot.contains(player_id) {
                        selected = Some((Arc::clone(pool), snapshot));
                        break;
                    }
                }
                Admission::Closed => {}
            }
        }

        let (pool, snapshot) = match selected {
            Some(found) => found,
            None => {
                let pool = registry.create_pool(self.config.capacity)?;
                let snapshot = pool.add(player_id).await;
                (pool, snapshot)
            }
        };

        tracing::info!(
            %player_id,
            pool_id = %snapshot.pool_id,
            members = snapshot.member_count(),
            capacity = snapshot.capacity,
            "player joined pool"
        );

        if snapshot.is_full() {
            tracing::info!(pool_id = %snapshot.pool_id, "pool is full");
            registry.terminal.insert(snapshot.pool_id, snapshot.clone());
        }
        drop(registry);

        if snapshot.state.is_open() {
            self.arm_expiry(pool);
        }

        Ok(snapshot)
    }

    /// Returns the latest snapshot of a pool.
    ///
    /// # Errors
    /// [`PoolError::UnknownPool`] if no pool with this id was ever created.
    pub async fn status(&self, pool_id: PoolId) -> Result<PoolSnapshot, PoolError> {
        let pool = {
            let registry = self.registry.lock().await;
            if let Some(snapshot) = registry.terminal.get(&pool_id) {
                return Ok(snapshot.clone());
            }
            registry
                .by_id
                .get(&pool_id)
                .cloned()
                .ok_or(PoolError::UnknownPool(pool_id))?
        };
        Ok(pool.snapshot().await)
    }

    /// Number of pools ever created (terminal ones included).
    pub async fn pool_count(&self) -> usize {
        self.registry.lock().await.pools.len()
    }

    /// Number of pools still accepting players.
    pub async fn open_pool_count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.pools.len() - registry.terminal.len()
    }

    /// Spawns the one-shot wait timer for a join.
    ///
    /// The timer is never cancelled. If the pool fills first, the expiry
    /// is simply refused by [`Pool::mark_expired`].
    fn arm_expiry(&self, pool: Arc<Pool>) {
        let registry = Arc::clone(&self.registry);
        let wait = self.config.wait;

        tokio::spawn(async move {
            tokio::time::sleep(wait).await;

            match pool.mark_expired().await {
                ExpiryOutcome::Expired(snapshot) => {
                    tracing::info!(
                        pool_id = %snapshot.pool_id,
                        members = snapshot.member_count(),
                        "pool timed out"
                    );
                    registry
                        .lock()
                        .await
                        .terminal
                        .insert(snapshot.pool_id, snapshot);
                }
                ExpiryOutcome::Unchanged(snapshot) => {
                    tracing::trace!(
                        pool_id = %snapshot.pool_id,
                        state = %snapshot.state,
                        "wait timer fired on terminal pool"
                    );
                }
            }
        });
    }
}

impl std::fmt::Debug for MatchMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchMaker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
