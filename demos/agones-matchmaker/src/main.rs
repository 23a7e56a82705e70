//! Matchmaker process for an Agones fleet.
//!
//! Usage: `agones-matchmaker [config.json]`. Log verbosity follows
//! `RUST_LOG` (default `info`).

use poolforge::prelude::*;
use poolforge::telemetry;

const DEFAULT_CONFIG: &str = "config.json";

#[tokio::main]
async fn main() -> Result<(), PoolforgeError> {
    telemetry::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = ServiceConfig::from_file(&path)?;

    let allocator = AgonesAllocator::new(config.allocator_config())?;
    let matchmaking = Matchmaking::new(config.pool_config(), allocator)?;

    tracing::info!(
        max_players = config.max_players,
        wait_time_secs = config.wait_time_secs,
        fleet = %config.fleet_name,
        "starting matchmaker"
    );

    let server = PoolforgeServerBuilder::new()
        .bind(&config.bind_addr())
        .build(matchmaking)
        .await?;

    server.run().await
}
