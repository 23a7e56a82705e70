//! Player registration: handing out fresh identities.
//!
//! Registration has nothing to do with matchmaking; it only guarantees
//! that every identity handed out by this process is unique.

use std::collections::HashSet;

use poolforge_protocol::PlayerId;
use rand::Rng;
use tokio::sync::Mutex;

/// Issues random, never-repeated player identities.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    issued: Mutex<HashSet<PlayerId>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an identity not issued before.
    ///
    /// Identities are random 32-bit values so they stay short in URLs;
    /// a collision with an earlier one is simply re-drawn.
    pub async fn register(&self) -> PlayerId {
        let mut issued = self.issued.lock().await;
        loop {
            let id = PlayerId(u64::from(rand::rng().random::<u32>()));
            if issued.insert(id) {
                tracing::info!(player_id = %id, "player registered");
                return id;
            }
        }
    }

    /// Returns `true` if `player_id` was issued by this registry.
    pub async fn is_registered(&self, player_id: PlayerId) -> bool {
        self.issued.lock().await.contains(&player_id)
    }

    pub async fn len(&self) -> usize {
        self.issued.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.issued.lock().await.is_empty()
    }
}
