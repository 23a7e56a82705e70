//! Error types for the allocation layer.

use poolforge_protocol::ProtocolError;

/// Errors from obtaining a game server allocation.
///
/// None of these are ever cached: the next lookup for the same pool
/// simply tries again.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// The request never completed (connection refused, timeout, ...).
    #[error("allocation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The allocator answered with a non-success HTTP status.
    #[error("allocator returned HTTP {0}")]
    Status(u16),

    /// The request body could not be encoded, or the response body could
    /// not be decoded.
    #[error(transparent)]
    Codec(#[from] ProtocolError),

    /// The allocator answered, but had no ready server to hand out.
    /// Carries the reported allocation state (e.g. `UnAllocated`).
    #[error("no game server allocated (state: {0})")]
    Unallocated(String),

    /// The allocation record lacked a usable address or port.
    #[error("malformed allocation: {0}")]
    Malformed(String),
}
