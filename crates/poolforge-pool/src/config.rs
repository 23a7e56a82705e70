//! Pool configuration and state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::PoolError;

// ---------------------------------------------------------------------------
// PoolConfig
// ---------------------------------------------------------------------------

/// Settings shared by every pool a [`MatchMaker`](crate::MatchMaker) creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum members per pool. Fixed when a pool is created.
    pub capacity: usize,

    /// How long a pool may stay open, counted from each join.
    pub wait: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            wait: Duration::from_secs(30),
        }
    }
}

impl PoolConfig {
    /// Creates a config with the given capacity and wait duration.
    pub fn new(capacity: usize, wait: Duration) -> Self {
        Self { capacity, wait }
    }

    /// Rejects values no pool can work with.
    ///
    /// # Errors
    /// [`PoolError::InvalidConfig`] if `capacity` or `wait` is zero.
    pub fn validated(self) -> Result<Self, PoolError> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "capacity must be at least 1".into(),
            ));
        }
        if self.wait.is_zero() {
            return Err(PoolError::InvalidConfig(
                "wait duration must be positive".into(),
            ));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// PoolState
// ---------------------------------------------------------------------------

/// The lifecycle state of a pool.
///
/// ```text
///          ┌──(capacity reached)──→ Full
///   Open ──┤
///          └──(wait elapsed)──────→ Expired
/// ```
///
/// `Full` and `Expired` are terminal. When both conditions race, the one
/// applied first under the pool's lock wins; in practice that is `Full`,
/// because it is set synchronously by the admitting join while expiry
/// fires later from a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolState {
    Open,
    Full,
    Expired,
}

impl PoolState {
    /// Returns `true` if the pool may still accept players.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` once no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Full | Self::Expired)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Full) | (Self::Open, Self::Expired)
        )
    }
}

impl std::fmt::Display for PoolState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Full => write!(f, "Full"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}
