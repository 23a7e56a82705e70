//! Error types for the pool layer.

use poolforge_protocol::PoolId;

/// Errors that can occur during pool operations.
///
/// Duplicate joins and full pools are not errors: they are resolved
/// inside the matchmaker and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// A new pool could not be registered. Nothing was applied.
    #[error("pool creation failed: {0}")]
    PoolCreationFailed(String),

    /// No pool with this id was ever created.
    #[error("pool {0} not found")]
    UnknownPool(PoolId),

    /// The pool configuration is unusable (zero capacity, zero wait).
    #[error("invalid pool config: {0}")]
    InvalidConfig(String),
}
