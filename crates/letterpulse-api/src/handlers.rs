//! Request handlers

pub mod analytics;
pub mod campaigns;
pub mod health;
pub mod metrics;
pub mod tracking;

use axum::http::StatusCode;
use axum::Json;
use letterpulse_core::CampaignError;
use serde::Serialize;
use tracing::error;

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

pub fn validation_error(message: impl Into<String>) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

/// Map campaign manager errors onto HTTP responses
pub fn campaign_error(e: CampaignError) -> ApiError {
    match e {
        CampaignError::NotFound => {
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "Campaign not found")
        }
        CampaignError::NotDraft
        | CampaignError::NotScheduled
        | CampaignError::InvalidTransition { .. } => error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_CAMPAIGN_STATE",
            e.to_string(),
        ),
        CampaignError::ScheduleInPast => {
            validation_error(e.to_string())
        }
        CampaignError::Validation(message) => validation_error(message),
        CampaignError::Database(e) => {
            error!("Database error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
        }
    }
}

/// Map common errors onto HTTP responses
pub fn common_error(e: letterpulse_common::Error) -> ApiError {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("Request failed: {}", e);
        return error_response(status, e.code(), "Internal server error");
    }
    error_response(status, e.code(), e.to_string())
}
