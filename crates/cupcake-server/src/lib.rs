//! Cupcake Server - HTTP API for the cupcake store
//!
//! Provides REST endpoints for:
//! - GET /v2/cupcake - List cupcakes
//! - POST /v2/cupcake - Create a cupcake
//! - GET /v2/cupcake/{cupcakeId} - Fetch a cupcake
//! - PUT /v2/cupcake/{cupcakeId} - Replace a cupcake
//! - DELETE /v2/cupcake/{cupcakeId} - Delete a cupcake
//! - GET /health - Liveness and record count

use axum::{Router, routing::get};
use cupcake_core::CupcakeStore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;

/// Version prefix every resource route is nested under
pub const API_PREFIX: &str = "/v2";

/// Cupcake server state
#[derive(Clone)]
pub struct CupcakeServer {
    /// Record store shared by every handler
    pub store: Arc<CupcakeStore>,
    /// When the server state was created, for uptime reporting
    pub started_at: Instant,
}

impl CupcakeServer {
    /// Create server state around an opened store
    pub fn new(store: Arc<CupcakeStore>) -> Self {
        Self {
            store,
            started_at: Instant::now(),
        }
    }
}

/// Build the full application router
pub fn router(server: CupcakeServer) -> Router {
    let cupcakes = Router::new()
        .route(
            "/cupcake",
            get(api::cupcake::list_cupcakes).post(api::cupcake::add_cupcake),
        )
        .route(
            "/cupcake/{cupcakeId}",
            get(api::cupcake::get_cupcake)
                .put(api::cupcake::update_cupcake)
                .delete(api::cupcake::delete_cupcake),
        );

    Router::new()
        .route("/health", get(api::health::health_check))
        .nest(API_PREFIX, cupcakes)
        .with_state(server)
        // Request/response tracing
        .layer(TraceLayer::new_for_http())
}
