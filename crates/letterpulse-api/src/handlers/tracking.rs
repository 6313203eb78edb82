//! Public tracking handlers
//!
//! These endpoints are hit by mail clients, not by API consumers, so their
//! failure behavior is deliberately asymmetric: the pixel always returns
//! the image, the click redirect favors the subscriber's navigation over
//! event capture, and only the explicit consent endpoints (unsubscribe,
//! spam complaint) surface errors.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use letterpulse_common::types::RequestMeta;
use letterpulse_core::tracking::{decode_redirect_url, decode_token, TrackingIdentity, TRACKING_PIXEL};
use letterpulse_storage::models::TrackingEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AppState;
use crate::handlers::{common_error, validation_error, ApiError};

const PIXEL_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, private";

/// Query parameters for the click redirect
#[derive(Debug, Deserialize)]
pub struct ClickQuery {
    pub url: Option<String>,
}

/// Request body for unsubscribe
///
/// The unsubscribe page already decoded the token client-side, so the
/// consent endpoints take the raw identifiers rather than the token.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub email_id: Uuid,
    pub subscriber_id: Uuid,
    pub campaign_id: Uuid,
    pub reason: Option<String>,
}

/// Request body for a spam complaint
#[derive(Debug, Deserialize)]
pub struct SpamComplaintRequest {
    pub email_id: Uuid,
    pub subscriber_id: Uuid,
    pub campaign_id: Uuid,
    pub complaint_type: Option<String>,
    pub feedback: Option<String>,
}

/// Response for a recorded unsubscribe
#[derive(Debug, Serialize)]
pub struct UnsubscribeResponse {
    pub message: String,
    pub unsubscribe: TrackingEvent,
}

/// Response for a recorded spam complaint
#[derive(Debug, Serialize)]
pub struct SpamComplaintResponse {
    pub message: String,
    pub complaint: TrackingEvent,
}

/// Pull client network metadata out of the request headers
fn request_meta(headers: &HeaderMap) -> RequestMeta {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        });

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    RequestMeta::new(ip_address, user_agent)
}

/// Open tracking pixel
///
/// GET /track/open/:token
///
/// Always answers 200 with the GIF, even for malformed tokens, so a broken
/// link never shows a broken image inside someone's email.
pub async fn track_open(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Response {
    match decode_token(&token) {
        Ok(identity) => {
            let meta = request_meta(&headers);
            state.recorder.record_open(&identity, &meta).await;
        }
        Err(e) => {
            debug!("Rejected open tracking token: {}", e);
            state.recorder.metrics().token_rejected("open");
        }
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, PIXEL_CACHE_CONTROL),
        ],
        TRACKING_PIXEL.to_vec(),
    )
        .into_response()
}

/// Click tracking redirect
///
/// GET /track/click/:token?url=<base64 destination>
///
/// A missing or undecodable destination is a 400; a bad token is not,
/// because the subscriber still deserves their redirect.
pub async fn track_click(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Query(query): Query<ClickQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let encoded_url = query
        .url
        .ok_or_else(|| validation_error("Missing url parameter"))?;

    let destination = decode_redirect_url(&encoded_url).map_err(common_error)?;

    match decode_token(&token) {
        Ok(identity) => {
            let meta = request_meta(&headers);
            state.recorder.record_click(&identity, &destination, &meta).await;
        }
        Err(e) => {
            debug!("Rejected click tracking token: {}", e);
            state.recorder.metrics().token_rejected("click");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, destination)]).into_response())
}

/// Unsubscribe
///
/// POST /track/unsubscribe
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> Result<Json<UnsubscribeResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    let identity = TrackingIdentity::new(body.email_id, body.subscriber_id, body.campaign_id);
    let meta = request_meta(&headers);
    let event = state
        .recorder
        .record_unsubscribe(&identity, body.reason, &meta)
        .await
        .map_err(common_error)?;

    Ok(Json(UnsubscribeResponse {
        message: "Unsubscribed successfully".to_string(),
        unsubscribe: event,
    }))
}

/// Spam complaint
///
/// POST /track/spam
pub async fn spam_complaint(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SpamComplaintRequest>, JsonRejection>,
) -> Result<Json<SpamComplaintResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    let identity = TrackingIdentity::new(body.email_id, body.subscriber_id, body.campaign_id);
    let meta = request_meta(&headers);
    let event = state
        .recorder
        .record_spam_complaint(&identity, body.complaint_type, body.feedback, &meta)
        .await
        .map_err(common_error)?;

    Ok(Json(SpamComplaintResponse {
        message: "Complaint recorded".to_string(),
        complaint: event,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use axum_test::TestServer;
    use letterpulse_core::tracking::encode_redirect_url;
    use letterpulse_core::TrackingMetrics;
    use letterpulse_storage::db::DatabasePool;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    /// Router over a lazily-connecting pool. The cases below fail token
    /// decoding or body validation up front, so no query ever runs.
    fn test_server() -> TestServer {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/letterpulse_test")
            .unwrap();
        let metrics = TrackingMetrics::new().unwrap();
        TestServer::new(create_router(DatabasePool::from_pool(pool), metrics)).unwrap()
    }

    #[tokio::test]
    async fn test_open_serves_pixel_for_garbage_token() {
        let server = test_server();

        let response = server.get("/track/open/definitely-not-a-token").await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/gif");
        assert_eq!(response.header("cache-control"), PIXEL_CACHE_CONTROL);
        assert_eq!(response.as_bytes().as_ref(), &TRACKING_PIXEL[..]);
    }

    #[tokio::test]
    async fn test_click_redirects_despite_bad_token() {
        let server = test_server();
        let url = encode_redirect_url("https://example.com/landing");

        let response = server
            .get(&format!("/track/click/not-a-token?url={}", url))
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), "https://example.com/landing");
    }

    #[tokio::test]
    async fn test_click_without_url_is_400() {
        let server = test_server();

        let response = server.get("/track/click/not-a-token").await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_click_with_bad_scheme_is_400() {
        let server = test_server();
        let url = encode_redirect_url("javascript:alert(1)");

        let response = server
            .get(&format!("/track/click/not-a-token?url={}", url))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_unsubscribe_malformed_body_is_400() {
        let server = test_server();

        // Missing required identifiers
        let response = server.post("/track/unsubscribe").json(&json!({})).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_spam_invalid_complaint_type_is_400() {
        let server = test_server();

        let response = server
            .post("/track/spam")
            .json(&json!({
                "email_id": Uuid::new_v4(),
                "subscriber_id": Uuid::new_v4(),
                "campaign_id": Uuid::new_v4(),
                "complaint_type": "phishing"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[test]
    fn test_request_meta_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "192.0.2.1".parse().unwrap());
        headers.insert(header::USER_AGENT, "TestMail/1.0".parse().unwrap());

        let meta = request_meta(&headers);
        assert_eq!(meta.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(meta.user_agent.as_deref(), Some("TestMail/1.0"));
    }

    #[test]
    fn test_request_meta_empty_headers() {
        let meta = request_meta(&HeaderMap::new());
        assert!(meta.ip_address.is_none());
        assert!(meta.user_agent.is_none());
    }
}
