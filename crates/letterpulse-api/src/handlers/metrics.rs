//! Prometheus metrics endpoint

use axum::{extract::State, http::StatusCode};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::error;

use crate::auth::AppState;

/// Prometheus exposition endpoint
///
/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let families = state.recorder.metrics().registry().gather();

    let mut buf = Vec::new();
    encoder.encode(&families, &mut buf).map_err(|e| {
        error!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    String::from_utf8(buf).map_err(|e| {
        error!("Metrics output was not UTF-8: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
