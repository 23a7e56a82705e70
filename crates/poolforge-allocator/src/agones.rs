//! [`Allocator`] backed by the Agones allocation REST endpoint.
//!
//! One `allocate` call is one `POST` of a `GameServerAllocation` resource
//! selecting a ready server from the configured fleet:
//!
//! ```text
//! POST http://<host>:<port>/apis/allocation.agones.dev/v1/namespaces/<ns>/gameserverallocations
//! { "apiVersion": "allocation.agones.dev/v1",
//!   "kind": "GameServerAllocation",
//!   "spec": { "required": { "matchLabels": { "agones.dev/fleet": "<fleet>" } } } }
//! ```
//!
//! The response is the same resource with a `status` block filled in:
//! `state`, `gameServerName`, `address`, and `ports`.

use std::time::Duration;

use poolforge_protocol::{Codec, JsonCodec};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::{AllocationError, Allocator, Endpoint};

const API_VERSION: &str = "allocation.agones.dev/v1";
const KIND: &str = "GameServerAllocation";
const FLEET_LABEL: &str = "agones.dev/fleet";
const ALLOCATED: &str = "Allocated";

// ---------------------------------------------------------------------------
// AllocatorConfig
// ---------------------------------------------------------------------------

/// Where the allocation endpoint lives and which fleet to draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub host: String,
    pub port: u16,
    /// Kubernetes namespace of the fleet.
    pub namespace: String,
    pub fleet_name: String,
    /// Upper bound on one allocation round trip.
    pub timeout: Duration,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            namespace: "default".to_string(),
            fleet_name: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl AllocatorConfig {
    /// The full allocation URL for this config.
    pub fn url(&self) -> String {
        format!(
            "http://{}:{}/apis/allocation.agones.dev/v1/namespaces/{}/gameserverallocations",
            self.host, self.port, self.namespace
        )
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationRequest<'a> {
    api_version: &'static str,
    kind: &'static str,
    spec: AllocationSpec<'a>,
}

#[derive(Debug, Serialize)]
struct AllocationSpec<'a> {
    required: Selector<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Selector<'a> {
    match_labels: std::collections::BTreeMap<&'static str, &'a str>,
}

impl<'a> AllocationRequest<'a> {
    fn for_fleet(fleet_name: &'a str) -> Self {
        Self {
            api_version: API_VERSION,
            kind: KIND,
            spec: AllocationSpec {
                required: Selector {
                    match_labels: [(FLEET_LABEL, fleet_name)].into_iter().collect(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct AllocationResponse {
    #[serde(default)]
    status: Option<AllocationStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllocationStatus {
    #[serde(default)]
    state: String,
    #[serde(default)]
    game_server_name: Option<String>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    ports: Vec<GameServerPort>,
}

#[derive(Debug, Deserialize)]
struct GameServerPort {
    port: u16,
}

/// Turns a decoded allocation record into an [`Endpoint`].
fn endpoint_from(
    response: AllocationResponse,
    raw: serde_json::Value,
) -> Result<Endpoint, AllocationError> {
    let status = response
        .status
        .ok_or_else(|| AllocationError::Malformed("missing status".into()))?;

    if status.state != ALLOCATED {
        return Err(AllocationError::Unallocated(status.state));
    }
    if status.address.is_empty() {
        return Err(AllocationError::Malformed("empty address".into()));
    }
    let port = status
        .ports
        .first()
        .map(|p| p.port)
        .ok_or_else(|| AllocationError::Malformed("no ports".into()))?;

    Ok(Endpoint {
        host: status.address,
        port,
        game_server: status.game_server_name,
        metadata: raw,
    })
}

// ---------------------------------------------------------------------------
// AgonesAllocator
// ---------------------------------------------------------------------------

/// Allocates game servers from an Agones fleet over HTTP.
#[derive(Debug, Clone)]
pub struct AgonesAllocator {
    client: reqwest::Client,
    url: String,
    fleet_name: String,
    codec: JsonCodec,
}

impl AgonesAllocator {
    /// Builds the HTTP client for the given config.
    ///
    /// # Errors
    /// [`AllocationError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: AllocatorConfig) -> Result<Self, AllocationError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("poolforge/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        let url = config.url();
        tracing::info!(%url, fleet = %config.fleet_name, "agones allocator configured");

        Ok(Self {
            client,
            url,
            fleet_name: config.fleet_name,
            codec: JsonCodec,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Allocator for AgonesAllocator {
    async fn allocate(&self) -> Result<Endpoint, AllocationError> {
        let body = self
            .codec
            .encode(&AllocationRequest::for_fleet(&self.fleet_name))?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AllocationError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        tracing::debug!(len = bytes.len(), "allocation response received");

        let raw: serde_json::Value = self.codec.decode(&bytes)?;
        let parsed: AllocationResponse = self.codec.decode(&bytes)?;
        endpoint_from(parsed, raw)
    }
}
