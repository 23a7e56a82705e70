//! Core protocol types for Poolforge.
//!
//! Everything here is either an identity shared by all layers or a value
//! that is serialized and handed back to a client.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Opaque to the matchmaker: it is never validated, only compared.
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a pool (one group being assembled for a match).
///
/// Pool ids are never reused for the lifetime of the process, which is
/// what lets the allocation cache key on them without eviction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PoolResult
// ---------------------------------------------------------------------------

/// What a client sees after joining a pool or polling its status.
///
/// `server_host`/`server_port` are only present once the pool is full AND
/// a game server has been allocated for it. Both are set through
/// [`PoolResult::with_server`], so one is never present without the other.
///
/// JSON shape:
///
/// ```json
/// { "poolId": 3, "isFull": true, "timedOut": false,
///   "currentMemberCount": 2, "capacity": 2, "players": [11, 12],
///   "serverHost": "10.0.0.5", "serverPort": 7123 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolResult {
    pub pool_id: PoolId,
    pub is_full: bool,
    pub timed_out: bool,
    pub current_member_count: usize,
    pub capacity: usize,
    /// Members in join order.
    pub players: Vec<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,
}

impl PoolResult {
    fn build(
        pool_id: PoolId,
        is_full: bool,
        timed_out: bool,
        players: Vec<PlayerId>,
        capacity: usize,
    ) -> Self {
        Self {
            pool_id,
            is_full,
            timed_out,
            current_member_count: players.len(),
            capacity,
            players,
            server_host: None,
            server_port: None,
        }
    }

    /// A pool that is still accepting players.
    pub fn open(pool_id: PoolId, players: Vec<PlayerId>, capacity: usize) -> Self {
        Self::build(pool_id, false, false, players, capacity)
    }

    /// A pool that reached capacity.
    pub fn full(pool_id: PoolId, players: Vec<PlayerId>, capacity: usize) -> Self {
        Self::build(pool_id, true, false, players, capacity)
    }

    /// A pool whose wait time elapsed before it filled.
    pub fn timed_out(pool_id: PoolId, players: Vec<PlayerId>, capacity: usize) -> Self {
        Self::build(pool_id, false, true, players, capacity)
    }

    /// Attaches the allocated game server endpoint.
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.server_host = Some(host.into());
        self.server_port = Some(port);
        self
    }

    /// Returns the allocated endpoint, if any.
    pub fn server(&self) -> Option<(&str, u16)> {
        match (&self.server_host, self.server_port) {
            (Some(host), Some(port)) => Some((host.as_str(), port)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(42).to_string(), "P-42");
    }

    #[test]
    fn test_pool_id_display() {
        assert_eq!(PoolId(3).to_string(), "M-3");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&PlayerId(9)).unwrap(), "9");
        assert_eq!(serde_json::to_string(&PoolId(9)).unwrap(), "9");
    }

    #[test]
    fn test_open_result_counts_members() {
        let result = PoolResult::open(PoolId(1), vec![PlayerId(1)], 2);
        assert!(!result.is_full);
        assert!(!result.timed_out);
        assert_eq!(result.current_member_count, 1);
        assert_eq!(result.server(), None);
    }

    #[test]
    fn test_timed_out_result_is_not_full() {
        let result = PoolResult::timed_out(PoolId(1), vec![PlayerId(1)], 2);
        assert!(result.timed_out);
        assert!(!result.is_full);
    }

    #[test]
    fn test_result_json_omits_server_until_allocated() {
        let result = PoolResult::full(PoolId(4), vec![PlayerId(1), PlayerId(2)], 2);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["poolId"], 4);
        assert_eq!(json["isFull"], true);
        assert_eq!(json["timedOut"], false);
        assert_eq!(json["currentMemberCount"], 2);
        assert_eq!(json["players"], serde_json::json!([1, 2]));
        assert!(json.get("serverHost").is_none());
        assert!(json.get("serverPort").is_none());
    }

    #[test]
    fn test_with_server_sets_host_and_port_together() {
        let result = PoolResult::full(PoolId(4), vec![PlayerId(1)], 1)
            .with_server("10.0.0.5", 7123);
        assert_eq!(result.server(), Some(("10.0.0.5", 7123)));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["serverHost"], "10.0.0.5");
        assert_eq!(json["serverPort"], 7123);
    }
}
