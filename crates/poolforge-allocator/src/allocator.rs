//! The allocation hook: where a game server comes from.
//!
//! Poolforge doesn't run game servers itself. It asks an orchestrator
//! (Agones, in production) for one through the [`Allocator`] trait, so
//! the cache logic can be exercised against a mock in tests and the
//! orchestrator can be swapped without touching the matchmaker.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::AllocationError;

/// A reachable game server instance handed out for one pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,

    /// Orchestrator-assigned handle for the allocation (for Agones, the
    /// name of the allocated `GameServer`).
    pub game_server: Option<String>,

    /// The full allocation record as returned by the orchestrator.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Endpoint {
    /// An endpoint with no orchestrator metadata.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            game_server: None,
            metadata: serde_json::Value::Null,
        }
    }
}

/// Obtains one game server allocation per call.
///
/// Implementations issue exactly one outbound request per `allocate` call;
/// deduplication per pool is the [`ServerFinder`](crate::ServerFinder)'s job.
///
/// # Example
///
/// ```rust
/// use poolforge_allocator::{AllocationError, Allocator, Endpoint};
///
/// /// Always hands out the same local server. Development only.
/// struct LocalAllocator;
///
/// impl Allocator for LocalAllocator {
///     async fn allocate(&self) -> Result<Endpoint, AllocationError> {
///         Ok(Endpoint::new("127.0.0.1", 7777))
///     }
/// }
/// ```
pub trait Allocator: Send + Sync + 'static {
    /// Requests a fresh game server from the orchestrator.
    fn allocate(
        &self,
    ) -> impl Future<Output = Result<Endpoint, AllocationError>> + Send;
}
