//! Health check handlers
//!
//! The database is the only dependency, so the detailed report carries a
//! single database block rather than a per-component map.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::AppState;

/// Basic health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health response
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub database: DatabaseHealth,
}

/// Database connectivity and pool state
#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pool_size: u32,
    pub pool_idle: usize,
}

/// Basic health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness check (is the process running)
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness check (can the service reach its database)
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    )
)]
pub async fn readiness(State(state): State<Arc<AppState>>) -> Result<StatusCode, StatusCode> {
    state
        .db_pool
        .ping()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    Ok(StatusCode::OK)
}

/// Detailed health check with database latency and pool state
#[utoipa::path(
    get,
    path = "/health/detailed",
    tag = "health",
    responses(
        (status = 200, description = "Detailed health status", body = DetailedHealthResponse)
    )
)]
pub async fn health_detailed(State(state): State<Arc<AppState>>) -> Json<DetailedHealthResponse> {
    let pool = state.db_pool.pool();
    let (pool_size, pool_idle) = (pool.size(), pool.num_idle());

    let database = match state.db_pool.ping().await {
        Ok(latency) => DatabaseHealth {
            status: "healthy",
            latency_ms: Some(latency.as_millis() as u64),
            error: None,
            pool_size,
            pool_idle,
        },
        Err(e) => DatabaseHealth {
            status: "unhealthy",
            latency_ms: None,
            error: Some(e.to_string()),
            pool_size,
            pool_idle,
        },
    };

    Json(DetailedHealthResponse {
        status: database.status,
        database,
    })
}
