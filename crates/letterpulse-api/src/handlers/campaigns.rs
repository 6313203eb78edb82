//! Campaign handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use letterpulse_core::AddRecipientsResult;
use letterpulse_storage::models::{
    AddRecipient, Campaign, CampaignRecipient, CampaignStatus, CreateCampaign, UpdateCampaign,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AppState, AuthContext};
use crate::handlers::{campaign_error, validation_error, ApiError};

/// Query parameters for listing campaigns
#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Query parameters for listing recipients
#[derive(Debug, Deserialize)]
pub struct ListRecipientsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

fn clamp_page(limit: i64, offset: i64) -> Result<(i64, i64), ApiError> {
    if limit < 1 || limit > 500 {
        return Err(validation_error("limit must be between 1 and 500"));
    }
    if offset < 0 {
        return Err(validation_error("offset must not be negative"));
    }
    Ok((limit, offset))
}

/// Campaign list response
#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub data: Vec<CampaignResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Campaign response
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub track_opens: bool,
    pub track_clicks: bool,
    pub track_unsubscribes: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Campaign> for CampaignResponse {
    fn from(c: Campaign) -> Self {
        let tags = c.tags_vec();
        Self {
            id: c.id,
            name: c.name,
            subject: c.subject,
            from_address: c.from_address,
            from_name: c.from_name,
            html_body: c.html_body,
            text_body: c.text_body,
            status: c.status,
            scheduled_at: c.scheduled_at,
            track_opens: c.track_opens,
            track_clicks: c.track_clicks,
            track_unsubscribes: c.track_unsubscribes,
            tags,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Recipient response
#[derive(Debug, Serialize)]
pub struct RecipientResponse {
    pub subscriber_id: Uuid,
    pub email: String,
    pub delivery_status: String,
    pub added_at: DateTime<Utc>,
}

impl From<CampaignRecipient> for RecipientResponse {
    fn from(r: CampaignRecipient) -> Self {
        Self {
            subscriber_id: r.subscriber_id,
            email: r.email,
            delivery_status: r.delivery_status,
            added_at: r.added_at,
        }
    }
}

/// Recipient list response
#[derive(Debug, Serialize)]
pub struct RecipientListResponse {
    pub data: Vec<RecipientResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Request body for creating a campaign
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub subject: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub track_opens: Option<bool>,
    pub track_clicks: Option<bool>,
    pub track_unsubscribes: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Request body for updating a campaign
#[derive(Debug, Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub from_address: Option<String>,
    pub from_name: Option<String>,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub track_opens: Option<bool>,
    pub track_clicks: Option<bool>,
    pub track_unsubscribes: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Request body for scheduling a campaign
#[derive(Debug, Deserialize)]
pub struct ScheduleCampaignRequest {
    pub scheduled_at: DateTime<Utc>,
}

/// Request body for adding recipients
#[derive(Debug, Deserialize)]
pub struct AddRecipientsRequest {
    pub recipients: Vec<AddRecipientEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AddRecipientEntry {
    pub subscriber_id: Uuid,
    pub email: String,
}

/// Request body for removing recipients
#[derive(Debug, Deserialize)]
pub struct RemoveRecipientsRequest {
    pub subscriber_ids: Vec<Uuid>,
}

/// Response for a recipient removal
#[derive(Debug, Serialize)]
pub struct RemoveRecipientsResponse {
    pub removed: u64,
}

/// List campaigns
///
/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListCampaignsQuery>,
) -> Result<Json<CampaignListResponse>, ApiError> {
    let (limit, offset) = clamp_page(query.limit, query.offset)?;

    let status = match query.status {
        Some(s) => Some(
            s.parse::<CampaignStatus>()
                .map_err(|e| validation_error(e))?,
        ),
        None => None,
    };

    let (campaigns, total) = state
        .manager
        .list_campaigns(auth.user_id, status, limit, offset)
        .await
        .map_err(campaign_error)?;

    Ok(Json(CampaignListResponse {
        data: campaigns.into_iter().map(CampaignResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// Create a campaign
///
/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CampaignResponse>), ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    let campaign = state
        .manager
        .create_campaign(CreateCampaign {
            user_id: auth.user_id,
            name: body.name,
            subject: body.subject,
            from_address: body.from_address,
            from_name: body.from_name,
            html_body: body.html_body,
            text_body: body.text_body,
            track_opens: body.track_opens,
            track_clicks: body.track_clicks,
            track_unsubscribes: body.track_unsubscribes,
            tags: body.tags,
        })
        .await
        .map_err(campaign_error)?;

    Ok((StatusCode::CREATED, Json(campaign.into())))
}

/// Get a campaign
///
/// GET /api/v1/campaigns/:campaign_id
pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let campaign = state
        .manager
        .get_campaign(auth.user_id, campaign_id)
        .await
        .map_err(campaign_error)?;

    Ok(Json(campaign.into()))
}

/// Update a draft campaign
///
/// PUT /api/v1/campaigns/:campaign_id
pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
    payload: Result<Json<UpdateCampaignRequest>, JsonRejection>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    let campaign = state
        .manager
        .update_campaign(
            auth.user_id,
            campaign_id,
            UpdateCampaign {
                name: body.name,
                subject: body.subject,
                from_address: body.from_address,
                from_name: body.from_name,
                html_body: body.html_body,
                text_body: body.text_body,
                track_opens: body.track_opens,
                track_clicks: body.track_clicks,
                track_unsubscribes: body.track_unsubscribes,
                tags: body.tags,
            },
        )
        .await
        .map_err(campaign_error)?;

    Ok(Json(campaign.into()))
}

/// Delete a draft campaign
///
/// DELETE /api/v1/campaigns/:campaign_id
pub async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .manager
        .delete_campaign(auth.user_id, campaign_id)
        .await
        .map_err(campaign_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Schedule a campaign
///
/// POST /api/v1/campaigns/:campaign_id/schedule
pub async fn schedule_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
    payload: Result<Json<ScheduleCampaignRequest>, JsonRejection>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    let campaign = state
        .manager
        .schedule_campaign(auth.user_id, campaign_id, body.scheduled_at)
        .await
        .map_err(campaign_error)?;

    Ok(Json(campaign.into()))
}

/// Cancel a scheduled campaign
///
/// POST /api/v1/campaigns/:campaign_id/cancel
pub async fn cancel_campaign(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let campaign = state
        .manager
        .cancel_campaign(auth.user_id, campaign_id)
        .await
        .map_err(campaign_error)?;

    Ok(Json(campaign.into()))
}

/// List campaign recipients
///
/// GET /api/v1/campaigns/:campaign_id/recipients
pub async fn list_recipients(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
    Query(query): Query<ListRecipientsQuery>,
) -> Result<Json<RecipientListResponse>, ApiError> {
    let (limit, offset) = clamp_page(query.limit, query.offset)?;

    let (recipients, total) = state
        .manager
        .list_recipients(auth.user_id, campaign_id, limit, offset)
        .await
        .map_err(campaign_error)?;

    Ok(Json(RecipientListResponse {
        data: recipients.into_iter().map(RecipientResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// Add recipients to a draft campaign
///
/// POST /api/v1/campaigns/:campaign_id/recipients
pub async fn add_recipients(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
    payload: Result<Json<AddRecipientsRequest>, JsonRejection>,
) -> Result<Json<AddRecipientsResult>, ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    let recipients = body
        .recipients
        .into_iter()
        .map(|r| AddRecipient {
            subscriber_id: r.subscriber_id,
            email: r.email,
        })
        .collect();

    let result = state
        .manager
        .add_recipients(auth.user_id, campaign_id, recipients)
        .await
        .map_err(campaign_error)?;

    Ok(Json(result))
}

/// Remove recipients from a draft campaign
///
/// DELETE /api/v1/campaigns/:campaign_id/recipients
pub async fn remove_recipients(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(campaign_id): Path<Uuid>,
    payload: Result<Json<RemoveRecipientsRequest>, JsonRejection>,
) -> Result<Json<RemoveRecipientsResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| validation_error(e.body_text()))?;

    if body.subscriber_ids.is_empty() {
        return Err(validation_error("subscriber_ids must not be empty"));
    }

    let removed = state
        .manager
        .remove_recipients(auth.user_id, campaign_id, &body.subscriber_ids)
        .await
        .map_err(campaign_error)?;

    Ok(Json(RemoveRecipientsResponse { removed }))
}
