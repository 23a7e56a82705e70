//! Game server allocation for Poolforge.
//!
//! Once a pool is full, its players need somewhere to play. This crate
//! obtains a live game server endpoint from an external fleet allocator
//! and remembers it per pool:
//!
//! 1. **Allocation**: asking the orchestrator for a server ([`Allocator`]
//!    trait, [`AgonesAllocator`] implementation)
//! 2. **Caching**: at most one allocation per pool id, reused by every
//!    later status poll ([`ServerFinder`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← asks for an endpoint once a pool reports full
//!     ↕
//! Allocator layer (this crate)  ← one outbound request per pool id
//!     ↕
//! Protocol layer (below)  ← PoolId, Codec
//! ```

mod agones;
mod allocator;
mod error;
mod finder;

pub use agones::{AgonesAllocator, AllocatorConfig};
pub use allocator::{Allocator, Endpoint};
pub use error::AllocationError;
pub use finder::ServerFinder;
