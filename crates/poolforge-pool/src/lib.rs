//! Pool assignment and lifecycle engine for Poolforge.
//!
//! Players arrive one at a time and are packed, in arrival order, into
//! fixed-capacity pools. A pool ends either `Full` (capacity reached) or
//! `Expired` (its wait time elapsed first); both are terminal.
//!
//! # Key types
//!
//! - [`MatchMaker`]: routes a player into a pool, arms the wait timers,
//!   answers status queries
//! - [`Pool`]: one group's membership behind its own lock
//! - [`PoolSnapshot`]: the consistent, externally visible view of a pool
//! - [`PoolState`]: `Open` → `Full` | `Expired`
//! - [`PoolConfig`]: capacity and wait duration

mod config;
mod error;
mod matchmaker;
mod pool;

pub use config::{PoolConfig, PoolState};
pub use error::PoolError;
pub use matchmaker::MatchMaker;
pub use pool::{Admission, ExpiryOutcome, Pool, PoolSnapshot};
