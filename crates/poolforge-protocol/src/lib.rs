//! Wire protocol for Poolforge.
//!
//! This crate defines the values that leave the matchmaker:
//!
//! - **Types** ([`PlayerId`], [`PoolId`], [`PoolResult`]): the identity
//!   newtypes shared by every layer, and the result a client sees after
//!   joining a pool or polling its status.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how structured values
//!   are converted to/from bytes (used for the outbound allocation call).
//! - **Errors** ([`ProtocolError`]): codec failures.
//!
//! # Layering
//!
//! Nothing here knows about pools, timers, or game servers. Every other
//! Poolforge crate depends on this one.
//!
//! ```text
//! Facade (HTTP) → Pool / Allocator → Protocol (ids, PoolResult, Codec)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{PlayerId, PoolId, PoolResult};
