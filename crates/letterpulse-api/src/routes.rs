//! API routes

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use letterpulse_core::{AnalyticsAggregator, CampaignManager, TrackingMetrics, TrackingRecorder};
use letterpulse_storage::DatabasePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AppState};
use crate::handlers::{analytics, campaigns, health, metrics, tracking};
use crate::openapi::create_openapi_routes;

/// Create the API router
pub fn create_router(db_pool: DatabasePool, tracking_metrics: TrackingMetrics) -> Router {
    let state = Arc::new(AppState {
        recorder: TrackingRecorder::new(&db_pool, tracking_metrics),
        manager: CampaignManager::new(&db_pool),
        aggregator: AnalyticsAggregator::new(&db_pool),
        db_pool,
    });

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/detailed", get(health::health_detailed))
        .with_state(state.clone());

    // Public tracking routes, hit by mail clients (no auth)
    let tracking_routes = Router::new()
        .route("/open/:token", get(tracking::track_open))
        .route("/click/:token", get(tracking::track_click))
        .route("/unsubscribe", post(tracking::unsubscribe))
        .route("/spam", post(tracking::spam_complaint))
        .with_state(state.clone());

    // Campaign routes
    let campaign_routes = Router::new()
        .route("/", get(campaigns::list_campaigns))
        .route("/", post(campaigns::create_campaign))
        .route("/:campaign_id", get(campaigns::get_campaign))
        .route("/:campaign_id", put(campaigns::update_campaign))
        .route("/:campaign_id", delete(campaigns::delete_campaign))
        .route("/:campaign_id/schedule", post(campaigns::schedule_campaign))
        .route("/:campaign_id/cancel", post(campaigns::cancel_campaign))
        .route("/:campaign_id/recipients", get(campaigns::list_recipients))
        .route("/:campaign_id/recipients", post(campaigns::add_recipients))
        .route(
            "/:campaign_id/recipients",
            delete(campaigns::remove_recipients),
        )
        .route(
            "/:campaign_id/analytics",
            get(analytics::get_campaign_analytics),
        );

    // API v1 routes with authentication
    let api_v1 = Router::new()
        .nest("/campaigns", campaign_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // OpenAPI documentation routes
    let openapi_routes = create_openapi_routes();

    // Combine all routes
    Router::new()
        .nest("/health", health_routes)
        .nest("/track", tracking_routes)
        .nest("/api/v1", api_v1)
        .route("/metrics", get(metrics::metrics).with_state(state))
        .merge(openapi_routes)
        .layer(TraceLayer::new_for_http())
}
