//! HTTP transport adapter and server loop.
//!
//! A thin layer over [`Matchmaking`]: parse the query, call the service,
//! serialize the [`PoolResult`]. Routes:
//!
//! | Route | Reply |
//! |---|---|
//! | `GET /register` | `{"playerId": n}` |
//! | `GET /join?id=<player>` | `PoolResult` for the pool the player landed in |
//! | `GET /match?id=<pool>` | `PoolResult` for that pool |

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use poolforge_allocator::Allocator;
use poolforge_pool::PoolError;
use poolforge_protocol::{PlayerId, PoolId, PoolResult};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::{Matchmaking, PoolforgeError};

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Registered {
    player_id: PlayerId,
}

/// An error reply: a status code and `{"error": "..."}`.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_id(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::NOT_ACCEPTABLE,
            message: rejection.body_text(),
        }
    }
}

impl From<PoolforgeError> for ApiError {
    fn from(err: PoolforgeError) -> Self {
        let status = match &err {
            PoolforgeError::Pool(PoolError::UnknownPool(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn register<A: Allocator>(State(service): State<Matchmaking<A>>) -> Json<Registered> {
    let player_id = service.register_player().await;
    Json(Registered { player_id })
}

async fn join<A: Allocator>(
    State(service): State<Matchmaking<A>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<PoolResult>, ApiError> {
    let Query(IdQuery { id }) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "join rejected");
        ApiError::bad_id(rejection)
    })?;
    let result = service.join_pool(PlayerId(id)).await.map_err(|e| {
        tracing::error!(player_id = id, error = %e, "join failed");
        ApiError::from(e)
    })?;
    Ok(Json(result))
}

async fn status<A: Allocator>(
    State(service): State<Matchmaking<A>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<PoolResult>, ApiError> {
    let Query(IdQuery { id }) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "status query rejected");
        ApiError::bad_id(rejection)
    })?;
    let result = service.query_status(PoolId(id)).await.map_err(|e| {
        tracing::debug!(pool_id = id, error = %e, "status lookup failed");
        ApiError::from(e)
    })?;
    Ok(Json(result))
}

/// Builds the HTTP routes over a matchmaking service.
pub fn router<A: Allocator>(service: Matchmaking<A>) -> Router {
    Router::new()
        .route("/register", get(register::<A>))
        .route("/join", get(join::<A>))
        .route("/match", get(status::<A>))
        .with_state(service)
}

// ---------------------------------------------------------------------------
// Builder and server
// ---------------------------------------------------------------------------

/// Builder for binding a Poolforge HTTP server.
///
/// # Example
///
/// ```rust,ignore
/// let server = PoolforgeServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(matchmaking)
///     .await?;
/// server.run().await
/// ```
#[derive(Debug, Clone)]
pub struct PoolforgeServerBuilder {
    bind_addr: String,
}

impl PoolforgeServerBuilder {
    /// Creates a builder bound to `127.0.0.1:8080` by default.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener.
    ///
    /// # Errors
    /// [`PoolforgeError::Io`] if the address cannot be bound.
    pub async fn build<A: Allocator>(
        self,
        service: Matchmaking<A>,
    ) -> Result<PoolforgeServer<A>, PoolforgeError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        Ok(PoolforgeServer { listener, service })
    }
}

impl Default for PoolforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Poolforge HTTP server.
///
/// Call [`run()`](Self::run) to start serving.
pub struct PoolforgeServer<A: Allocator> {
    listener: TcpListener,
    service: Matchmaking<A>,
}

impl<A: Allocator> PoolforgeServer<A> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), PoolforgeError> {
        tracing::info!(addr = ?self.listener.local_addr().ok(), "Poolforge server running");
        axum::serve(self.listener, router(self.service)).await?;
        Ok(())
    }
}
