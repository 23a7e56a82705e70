//! Service configuration loaded from a JSON file.
//!
//! Keys match the `config.json` the matchmaker has always shipped with:
//!
//! ```json
//! {
//!   "MatchmakingPort": 8080,
//!   "AllocatorHost": "agones-allocator.agones-system",
//!   "AllocatorPort": 8000,
//!   "FleetName": "arena",
//!   "MaxPlayers": 2,
//!   "WaitTime": 30
//! }
//! ```
//!
//! `BindHost`, `Namespace`, and `AllocatorTimeoutSecs` are optional.

use std::path::Path;
use std::time::Duration;

use poolforge_allocator::AllocatorConfig;
use poolforge_pool::PoolConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading a [`ServiceConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the matchmaker process needs at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceConfig {
    /// Port the HTTP adapter listens on.
    #[serde(rename = "MatchmakingPort")]
    pub listen_port: u16,

    #[serde(default = "default_bind_host")]
    pub bind_host: String,

    pub allocator_host: String,
    pub allocator_port: u16,

    #[serde(default)]
    pub fleet_name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_allocator_timeout_secs")]
    pub allocator_timeout_secs: u64,

    /// Pool capacity.
    pub max_players: usize,

    /// Pool wait time, in seconds.
    #[serde(rename = "WaitTime")]
    pub wait_time_secs: u64,
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_allocator_timeout_secs() -> u64 {
    10
}

impl ServiceConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    /// [`ConfigError`] if the file is unreadable, not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values a running matchmaker depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_players == 0 {
            return Err(ConfigError::Invalid("MaxPlayers must be at least 1".into()));
        }
        if self.wait_time_secs == 0 {
            return Err(ConfigError::Invalid("WaitTime must be at least 1 second".into()));
        }
        if self.allocator_host.trim().is_empty() {
            return Err(ConfigError::Invalid("AllocatorHost must not be empty".into()));
        }
        if self.fleet_name.trim().is_empty() {
            return Err(ConfigError::Invalid("FleetName must not be empty".into()));
        }
        Ok(())
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.max_players, Duration::from_secs(self.wait_time_secs))
    }

    pub fn allocator_config(&self) -> AllocatorConfig {
        AllocatorConfig {
            host: self.allocator_host.clone(),
            port: self.allocator_port,
            namespace: self.namespace.clone(),
            fleet_name: self.fleet_name.clone(),
            timeout: Duration::from_secs(self.allocator_timeout_secs),
        }
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.listen_port)
    }
}
