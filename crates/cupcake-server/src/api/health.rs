//! Health check endpoint

use axum::extract::{Json, State};
use serde::Serialize;

use crate::CupcakeServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: &'static str,
    /// Version information
    pub version: &'static str,
    /// Number of stored cupcakes
    pub cupcakes: usize,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Get health status
pub async fn health_check(State(server): State<CupcakeServer>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        cupcakes: server.store.len(),
        uptime_seconds: server.started_at.elapsed().as_secs(),
    })
}
