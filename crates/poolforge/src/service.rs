//! The matchmaking service: what the transport adapter talks to.
//!
//! Ties the layers together: player registration, the [`MatchMaker`], and
//! the [`ServerFinder`]. Every reply is a [`PoolResult`]; once a pool is
//! full the reply also carries the allocated game server, if allocation
//! has succeeded.

use std::sync::Arc;

use poolforge_allocator::{Allocator, ServerFinder};
use poolforge_pool::{MatchMaker, PoolConfig, PoolSnapshot};
use poolforge_protocol::{PlayerId, PoolId, PoolResult};

use crate::{PlayerRegistry, PoolforgeError};

struct Inner<A: Allocator> {
    matchmaker: MatchMaker,
    finder: ServerFinder<A>,
    players: PlayerRegistry,
}

/// Shared matchmaking state.
///
/// Cheap to clone (one `Arc`); every request handler gets its own clone.
pub struct Matchmaking<A: Allocator> {
    inner: Arc<Inner<A>>,
}

impl<A: Allocator> Clone for Matchmaking<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Allocator> Matchmaking<A> {
    /// Builds a service with a fresh matchmaker.
    ///
    /// # Errors
    /// [`PoolforgeError::Pool`] if `config` is invalid.
    pub fn new(config: PoolConfig, allocator: A) -> Result<Self, PoolforgeError> {
        Ok(Self::from_parts(MatchMaker::new(config)?, allocator))
    }

    /// Builds a service around an existing matchmaker.
    pub fn from_parts(matchmaker: MatchMaker, allocator: A) -> Self {
        Self {
            inner: Arc::new(Inner {
                matchmaker,
                finder: ServerFinder::new(allocator),
                players: PlayerRegistry::new(),
            }),
        }
    }

    /// Issues a fresh player identity.
    pub async fn register_player(&self) -> PlayerId {
        self.inner.players.register().await
    }

    /// Puts a player into a pool.
    ///
    /// # Errors
    /// [`PoolforgeError::Pool`] if a needed pool could not be created.
    pub async fn join_pool(&self, player_id: PlayerId) -> Result<PoolResult, PoolforgeError> {
        let snapshot = self.inner.matchmaker.join(player_id).await?;
        Ok(self.reply(snapshot).await)
    }

    /// Reports a pool's current state.
    ///
    /// # Errors
    /// [`PoolforgeError::Pool`] wrapping `UnknownPool` if the pool id was
    /// never issued.
    pub async fn query_status(&self, pool_id: PoolId) -> Result<PoolResult, PoolforgeError> {
        let snapshot = self.inner.matchmaker.status(pool_id).await?;
        Ok(self.reply(snapshot).await)
    }

    pub fn matchmaker(&self) -> &MatchMaker {
        &self.inner.matchmaker
    }

    pub fn finder(&self) -> &ServerFinder<A> {
        &self.inner.finder
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.inner.players
    }

    /// Converts a snapshot to a reply, attaching a server once full.
    ///
    /// Allocation runs outside every pool lock. A failed allocation still
    /// yields a full result, just without host and port; the client's
    /// next poll retries.
    async fn reply(&self, snapshot: PoolSnapshot) -> PoolResult {
        let result = snapshot.to_result();
        if !snapshot.is_full() {
            return result;
        }

        tracing::info!(
            pool_id = %snapshot.pool_id,
            players = ?snapshot.members,
            "players join server"
        );

        match self.inner.finder.resolve(snapshot.pool_id).await {
            Ok(endpoint) => result.with_server(endpoint.host, endpoint.port),
            Err(e) => {
                tracing::warn!(
                    pool_id = %snapshot.pool_id,
                    error = %e,
                    "pool is full but has no server yet"
                );
                result
            }
        }
    }
}
