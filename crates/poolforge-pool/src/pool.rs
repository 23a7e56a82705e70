//! A single pool: one group's membership behind its own lock.
//!
//! Every mutation recomputes the pool's [`PoolSnapshot`] while the lock is
//! still held, so readers always get a consistent view (id, state, members)
//! without re-deriving it from the member list.

use poolforge_protocol::{PlayerId, PoolId, PoolResult};
use tokio::sync::Mutex;

use crate::PoolState;

/// The externally visible view of a pool at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub pool_id: PoolId,
    pub state: PoolState,
    /// Members in join order.
    pub members: Vec<PlayerId>,
    pub capacity: usize,
}

impl PoolSnapshot {
    pub fn is_full(&self) -> bool {
        self.state == PoolState::Full
    }

    pub fn timed_out(&self) -> bool {
        self.state == PoolState::Expired
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.members.contains(&player_id)
    }

    /// Converts to the wire result, without any server endpoint attached.
    pub fn to_result(&self) -> PoolResult {
        let members = self.members.clone();
        match self.state {
            PoolState::Open => PoolResult::open(self.pool_id, members, self.capacity),
            PoolState::Full => PoolResult::full(self.pool_id, members, self.capacity),
            PoolState::Expired => {
                PoolResult::timed_out(self.pool_id, members, self.capacity)
            }
        }
    }
}

/// Whether a pool can take a given player, evaluated under the pool's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Not a member and there is room.
    Admit,
    /// Already a member, whatever the pool's state. Carries the pool's
    /// current snapshot.
    Duplicate(PoolSnapshot),
    /// Not a member, and the pool is full or expired.
    Closed,
}

/// Result of [`Pool::mark_expired`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// This call moved the pool from `Open` to `Expired`.
    Expired(PoolSnapshot),
    /// The pool was already terminal (filled first, or expired by an
    /// earlier timer). Nothing changed.
    Unchanged(PoolSnapshot),
}

impl ExpiryOutcome {
    pub fn snapshot(&self) -> &PoolSnapshot {
        match self {
            Self::Expired(snapshot) | Self::Unchanged(snapshot) => snapshot,
        }
    }
}

struct PoolInner {
    members: Vec<PlayerId>,
    state: PoolState,
    snapshot: PoolSnapshot,
}

impl PoolInner {
    fn refresh(&mut self, pool_id: PoolId, capacity: usize) {
        self.snapshot = PoolSnapshot {
            pool_id,
            state: self.state,
            members: self.members.clone(),
            capacity,
        };
    }
}

/// One fixed-capacity group of players.
///
/// Shared as `Arc<Pool>` between the matchmaker, the joining request, and
/// the pool's wait timers.
pub struct Pool {
    id: PoolId,
    capacity: usize,
    inner: Mutex<PoolInner>,
}

impl Pool {
    /// Creates an empty, open pool. `capacity` must be positive.
    pub fn new(id: PoolId, capacity: usize) -> Self {
        let snapshot = PoolSnapshot {
            pool_id: id,
            state: PoolState::Open,
            members: Vec::new(),
            capacity,
        };
        Self {
            id,
            capacity,
            inner: Mutex::new(PoolInner {
                members: Vec::with_capacity(capacity),
                state: PoolState::Open,
                snapshot,
            }),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reports whether `player_id` could be added, without changing anything.
    pub async fn try_admit(&self, player_id: PlayerId) -> Admission {
        let inner = self.inner.lock().await;
        if inner.members.contains(&player_id) {
            return Admission::Duplicate(inner.snapshot.clone());
        }
        match inner.state {
            PoolState::Open => Admission::Admit,
            PoolState::Full | PoolState::Expired => Admission::Closed,
        }
    }

    /// Appends `player_id` if it is new and the pool is open.
    ///
    /// A no-op on a member, a full pool, or an expired pool; the existing
    /// snapshot is returned unchanged. Never exceeds capacity.
    pub async fn add(&self, player_id: PlayerId) -> PoolSnapshot {
        let mut inner = self.inner.lock().await;
        if !inner.state.is_open() || inner.members.contains(&player_id) {
            return inner.snapshot.clone();
        }

        inner.members.push(player_id);
        if inner.members.len() >= self.capacity {
            inner.state = PoolState::Full;
        }
        inner.refresh(self.id, self.capacity);

        tracing::debug!(
            pool_id = %self.id,
            %player_id,
            members = inner.members.len(),
            capacity = self.capacity,
            state = %inner.state,
            "player added to pool"
        );

        inner.snapshot.clone()
    }

    /// Moves an open pool to `Expired`. Full pools ignore expiry.
    pub async fn mark_expired(&self) -> ExpiryOutcome {
        let mut inner = self.inner.lock().await;
        if !inner.state.can_transition_to(PoolState::Expired) {
            return ExpiryOutcome::Unchanged(inner.snapshot.clone());
        }

        inner.state = PoolState::Expired;
        inner.refresh(self.id, self.capacity);
        ExpiryOutcome::Expired(inner.snapshot.clone())
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> PoolSnapshot {
        self.inner.lock().await.snapshot.clone()
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.id)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn pool(capacity: usize) -> Pool {
        Pool::new(PoolId(1), capacity)
    }

    // =====================================================================
    // try_admit()
    // =====================================================================

    #[tokio::test]
    async fn test_try_admit_empty_pool_admits() {
        let p = pool(2);
        assert_eq!(p.try_admit(pid(1)).await, Admission::Admit);
    }

    #[tokio::test]
    async fn test_try_admit_member_reports_duplicate() {
        let p = pool(3);
        p.add(pid(1)).await;

        match p.try_admit(pid(1)).await {
            Admission::Duplicate(snapshot) => {
                assert_eq!(snapshot.members, vec![pid(1)]);
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_try_admit_does_not_mutate() {
        let p = pool(2);
        p.try_admit(pid(1)).await;
        assert_eq!(p.snapshot().await.member_count(), 0);
    }

    #[tokio::test]
    async fn test_try_admit_full_pool_is_closed_for_newcomers() {
        let p = pool(1);
        p.add(pid(1)).await;
        assert_eq!(p.try_admit(pid(2)).await, Admission::Closed);
    }

    #[tokio::test]
    async fn test_try_admit_full_pool_still_reports_member_duplicate() {
        let p = pool(1);
        p.add(pid(1)).await;
        assert!(matches!(p.try_admit(pid(1)).await, Admission::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_try_admit_expired_pool_reports_member_duplicate() {
        let p = pool(2);
        p.add(pid(1)).await;
        p.mark_expired().await;

        match p.try_admit(pid(1)).await {
            Admission::Duplicate(snapshot) => {
                assert!(snapshot.timed_out());
                assert_eq!(snapshot.members, vec![pid(1)]);
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_try_admit_expired_pool_is_closed_for_newcomers() {
        let p = pool(2);
        p.add(pid(1)).await;
        p.mark_expired().await;

        assert_eq!(p.try_admit(pid(2)).await, Admission::Closed);
    }

    // =====================================================================
    // add()
    // =====================================================================

    #[tokio::test]
    async fn test_add_keeps_join_order() {
        let p = pool(3);
        p.add(pid(3)).await;
        p.add(pid(1)).await;
        let snapshot = p.add(pid(2)).await;
        assert_eq!(snapshot.members, vec![pid(3), pid(1), pid(2)]);
    }

    #[tokio::test]
    async fn test_add_marks_full_at_capacity() {
        let p = pool(2);
        let first = p.add(pid(1)).await;
        assert_eq!(first.state, PoolState::Open);

        let second = p.add(pid(2)).await;
        assert_eq!(second.state, PoolState::Full);
        assert!(second.is_full());
    }

    #[tokio::test]
    async fn test_add_same_player_twice_is_idempotent() {
        let p = pool(3);
        let first = p.add(pid(1)).await;
        let second = p.add(pid(1)).await;
        assert_eq!(first, second);
        assert_eq!(second.member_count(), 1);
    }

    #[tokio::test]
    async fn test_add_to_full_pool_is_noop() {
        let p = pool(1);
        let full = p.add(pid(1)).await;
        let after = p.add(pid(2)).await;
        assert_eq!(full, after);
        assert_eq!(after.members, vec![pid(1)]);
    }

    #[tokio::test]
    async fn test_add_to_expired_pool_is_noop() {
        let p = pool(2);
        p.add(pid(1)).await;
        p.mark_expired().await;

        let snapshot = p.add(pid(2)).await;
        assert!(snapshot.timed_out());
        assert_eq!(snapshot.members, vec![pid(1)]);
    }

    // =====================================================================
    // mark_expired()
    // =====================================================================

    #[tokio::test]
    async fn test_mark_expired_open_pool_transitions() {
        let p = pool(2);
        p.add(pid(1)).await;

        let outcome = p.mark_expired().await;
        assert!(matches!(outcome, ExpiryOutcome::Expired(_)));
        assert!(outcome.snapshot().timed_out());
        assert!(!outcome.snapshot().is_full());
    }

    #[tokio::test]
    async fn test_mark_expired_twice_is_idempotent() {
        let p = pool(2);
        p.mark_expired().await;

        let outcome = p.mark_expired().await;
        assert!(matches!(outcome, ExpiryOutcome::Unchanged(_)));
        assert!(outcome.snapshot().timed_out());
    }

    #[tokio::test]
    async fn test_mark_expired_full_pool_keeps_full() {
        let p = pool(2);
        p.add(pid(1)).await;
        p.add(pid(2)).await;

        let outcome = p.mark_expired().await;
        assert!(matches!(outcome, ExpiryOutcome::Unchanged(_)));
        assert!(outcome.snapshot().is_full());
        assert!(!outcome.snapshot().timed_out());
    }

    // =====================================================================
    // snapshot / to_result
    // =====================================================================

    #[tokio::test]
    async fn test_to_result_reflects_state() {
        let p = pool(2);
        p.add(pid(1)).await;
        let open = p.snapshot().await.to_result();
        assert!(!open.is_full && !open.timed_out);
        assert_eq!(open.current_member_count, 1);
        assert_eq!(open.capacity, 2);

        p.mark_expired().await;
        let expired = p.snapshot().await.to_result();
        assert!(expired.timed_out);
        assert!(!expired.is_full);
    }

    #[tokio::test]
    async fn test_concurrent_adds_never_exceed_capacity() {
        let p = std::sync::Arc::new(pool(3));
        let mut tasks = Vec::new();
        for i in 0..20 {
            let p = std::sync::Arc::clone(&p);
            tasks.push(tokio::spawn(async move { p.add(pid(i)).await }));
        }
        for task in tasks {
            let snapshot = task.await.unwrap();
            assert!(snapshot.member_count() <= 3);
        }

        let snapshot = p.snapshot().await;
        assert_eq!(snapshot.member_count(), 3);
        assert!(snapshot.is_full());
    }
}
