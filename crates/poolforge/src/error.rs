//! Unified error type for Poolforge.

use poolforge_allocator::AllocationError;
use poolforge_pool::PoolError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum PoolforgeError {
    /// Pool layer: unknown pool, failed pool creation, bad pool config.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Allocation layer. Only surfaces from setup; during matchmaking an
    /// allocation failure is reported in-band as "full, no server yet".
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Binding or serving the HTTP listener failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
