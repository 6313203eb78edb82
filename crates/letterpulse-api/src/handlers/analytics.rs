//! Campaign analytics handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use letterpulse_core::CampaignAnalytics;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AppState, AuthContext};
use crate::handlers::{campaign_error, ApiError};

/// Get analytics for a campaign
///
/// GET /api/v1/campaigns/:campaign_id/analytics
pub async fn get_campaign_analytics(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignAnalytics>, ApiError> {
    let analytics = state
        .aggregator
        .campaign_analytics(auth.user_id, campaign_id)
        .await
        .map_err(campaign_error)?;

    Ok(Json(analytics))
}
