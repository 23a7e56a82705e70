//! # Poolforge
//!
//! Arrival-order matchmaking with game server allocation.
//!
//! Players register, join, and poll. Poolforge packs them into
//! fixed-size pools in the order they arrive; when a pool fills, it asks
//! the fleet allocator for a game server and hands the endpoint to every
//! member on their next poll. Pools that wait too long time out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poolforge::prelude::*;
//!
//! # async fn run() -> Result<(), PoolforgeError> {
//! let config = ServiceConfig::from_file("config.json")?;
//! let allocator = AgonesAllocator::new(config.allocator_config())?;
//! let matchmaking = Matchmaking::new(config.pool_config(), allocator)?;
//!
//! let server = PoolforgeServerBuilder::new()
//!     .bind(&config.bind_addr())
//!     .build(matchmaking)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod registry;
mod server;
mod service;
pub mod telemetry;

pub use config::{ConfigError, ServiceConfig};
pub use error::PoolforgeError;
pub use registry::PlayerRegistry;
pub use server::{PoolforgeServer, PoolforgeServerBuilder, router};
pub use service::Matchmaking;

/// Everything needed to embed or run a matchmaker.
pub mod prelude {
    pub use crate::{
        ConfigError, Matchmaking, PlayerRegistry, PoolforgeError, PoolforgeServer,
        PoolforgeServerBuilder, ServiceConfig,
    };
    pub use poolforge_allocator::{
        AgonesAllocator, AllocationError, Allocator, AllocatorConfig, Endpoint,
        ServerFinder,
    };
    pub use poolforge_pool::{MatchMaker, PoolConfig, PoolError, PoolSnapshot, PoolState};
    pub use poolforge_protocol::{PlayerId, PoolId, PoolResult};
}
