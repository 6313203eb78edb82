//! Campaign Manager - Handles campaign lifecycle and recipient management

use chrono::{DateTime, Utc};
use letterpulse_common::types::{EmailAddress, UserId};
use letterpulse_storage::db::DatabasePool;
use letterpulse_storage::models::{
    AddRecipient, Campaign, CampaignRecipient, CampaignStatus, CreateCampaign, UpdateCampaign,
};
use letterpulse_storage::repository::{CampaignRepository, RecipientRepository};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Campaign manager errors
#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Campaign not found")]
    NotFound,

    #[error("Campaign is not in draft status")]
    NotDraft,

    #[error("Campaign is not in scheduled status")]
    NotScheduled,

    #[error("Scheduled time must be in the future")]
    ScheduleInPast,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of a batch recipient add
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AddRecipientsResult {
    pub added: u64,
    pub skipped: u64,
    pub total: u64,
}

/// Campaign Manager - Manages campaign lifecycle
///
/// All state transitions funnel through the conditional UPDATEs in the
/// repository, so two concurrent requests can never both win the same
/// transition; the loser gets a state error.
#[derive(Clone)]
pub struct CampaignManager {
    campaign_repo: CampaignRepository,
    recipient_repo: RecipientRepository,
}

impl CampaignManager {
    /// Create a new campaign manager
    pub fn new(db_pool: &DatabasePool) -> Self {
        let pool = db_pool.pool().clone();
        Self {
            campaign_repo: CampaignRepository::new(pool.clone()),
            recipient_repo: RecipientRepository::new(pool),
        }
    }

    /// Create a new draft campaign
    pub async fn create_campaign(&self, input: CreateCampaign) -> Result<Campaign, CampaignError> {
        Self::validate_required("name", &input.name)?;
        Self::validate_required("subject", &input.subject)?;
        if EmailAddress::parse(&input.from_address).is_none() {
            return Err(CampaignError::Validation(format!(
                "Invalid from address: {}",
                input.from_address
            )));
        }

        let campaign = self.campaign_repo.create(input).await?;
        info!(campaign_id = %campaign.id, "Campaign created");
        Ok(campaign)
    }

    /// Get a campaign owned by a user
    pub async fn get_campaign(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
    ) -> Result<Campaign, CampaignError> {
        self.campaign_repo
            .get_by_user(user_id, campaign_id)
            .await?
            .ok_or(CampaignError::NotFound)
    }

    /// List campaigns for a user
    pub async fn list_campaigns(
        &self,
        user_id: UserId,
        status: Option<CampaignStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Campaign>, i64), CampaignError> {
        let campaigns = self
            .campaign_repo
            .list_by_user(user_id, status, limit, offset)
            .await?;
        let total = self.campaign_repo.count_by_user(user_id, status).await?;
        Ok((campaigns, total))
    }

    /// Update a draft campaign
    pub async fn update_campaign(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
        input: UpdateCampaign,
    ) -> Result<Campaign, CampaignError> {
        if let Some(ref name) = input.name {
            Self::validate_required("name", name)?;
        }
        if let Some(ref subject) = input.subject {
            Self::validate_required("subject", subject)?;
        }
        if let Some(ref from_address) = input.from_address {
            if EmailAddress::parse(from_address).is_none() {
                return Err(CampaignError::Validation(format!(
                    "Invalid from address: {}",
                    from_address
                )));
            }
        }

        match self
            .campaign_repo
            .update_draft(campaign_id, user_id, input)
            .await?
        {
            Some(campaign) => Ok(campaign),
            None => Err(self.draft_failure(user_id, campaign_id).await?),
        }
    }

    /// Schedule a draft campaign for sending at a future time
    ///
    /// A future send time is the only precondition beyond being a draft;
    /// an empty recipient list schedules fine and simply sends to nobody.
    pub async fn schedule_campaign(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Campaign, CampaignError> {
        Self::validate_schedule_time(scheduled_at)?;

        match self
            .campaign_repo
            .schedule(campaign_id, user_id, scheduled_at)
            .await?
        {
            Some(campaign) => {
                info!(
                    campaign_id = %campaign_id,
                    scheduled_at = %scheduled_at,
                    "Campaign scheduled"
                );
                Ok(campaign)
            }
            None => Err(self.draft_failure(user_id, campaign_id).await?),
        }
    }

    /// Cancel a scheduled campaign before sending begins
    pub async fn cancel_campaign(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
    ) -> Result<Campaign, CampaignError> {
        match self.campaign_repo.cancel(campaign_id, user_id).await? {
            Some(campaign) => {
                info!(campaign_id = %campaign_id, "Campaign cancelled");
                Ok(campaign)
            }
            None => {
                // Lost the row or lost the race; report which
                match self.campaign_repo.get_by_user(user_id, campaign_id).await? {
                    Some(_) => Err(CampaignError::NotScheduled),
                    None => Err(CampaignError::NotFound),
                }
            }
        }
    }

    /// Soft-delete a draft campaign
    pub async fn delete_campaign(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
    ) -> Result<(), CampaignError> {
        if self.campaign_repo.delete_draft(campaign_id, user_id).await? {
            info!(campaign_id = %campaign_id, "Campaign deleted");
            Ok(())
        } else {
            Err(self.draft_failure(user_id, campaign_id).await?)
        }
    }

    /// Add recipients to a draft campaign
    ///
    /// Duplicates within the campaign are skipped, not errors, so the
    /// result reports added and skipped counts separately.
    pub async fn add_recipients(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
        recipients: Vec<AddRecipient>,
    ) -> Result<AddRecipientsResult, CampaignError> {
        self.require_draft(user_id, campaign_id).await?;

        if recipients.is_empty() {
            return Err(CampaignError::Validation(
                "Recipient list is empty".to_string(),
            ));
        }
        for recipient in &recipients {
            if EmailAddress::parse(&recipient.email).is_none() {
                return Err(CampaignError::Validation(format!(
                    "Invalid recipient email: {}",
                    recipient.email
                )));
            }
        }

        let total = recipients.len() as u64;
        let added = self
            .recipient_repo
            .add_batch(campaign_id, &recipients)
            .await?;

        info!(
            campaign_id = %campaign_id,
            added,
            skipped = total - added,
            "Recipients added"
        );

        Ok(AddRecipientsResult {
            added,
            skipped: total - added,
            total,
        })
    }

    /// Remove recipients from a draft campaign
    pub async fn remove_recipients(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
        subscriber_ids: &[Uuid],
    ) -> Result<u64, CampaignError> {
        self.require_draft(user_id, campaign_id).await?;

        let removed = self
            .recipient_repo
            .remove(campaign_id, subscriber_ids)
            .await?;
        info!(campaign_id = %campaign_id, removed, "Recipients removed");
        Ok(removed)
    }

    /// List recipients of a campaign
    pub async fn list_recipients(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CampaignRecipient>, i64), CampaignError> {
        // Ownership check before exposing the list
        self.get_campaign(user_id, campaign_id).await?;

        let recipients = self
            .recipient_repo
            .list_by_campaign(campaign_id, limit, offset)
            .await?;
        let total = self.recipient_repo.count_by_campaign(campaign_id).await?;
        Ok((recipients, total))
    }

    /// Advance a campaign along the send path (used by the send worker)
    pub async fn transition_campaign(
        &self,
        campaign_id: Uuid,
        from: CampaignStatus,
        to: CampaignStatus,
    ) -> Result<Campaign, CampaignError> {
        if !from.can_transition(to) {
            return Err(CampaignError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.campaign_repo
            .transition(campaign_id, from, to)
            .await?
            .ok_or(CampaignError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Get scheduled campaigns whose send time has arrived
    pub async fn get_scheduled_ready(&self) -> Result<Vec<Campaign>, CampaignError> {
        Ok(self.campaign_repo.get_scheduled_ready().await?)
    }

    /// Verify a campaign exists, is owned by the user, and is in draft
    async fn require_draft(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
    ) -> Result<Campaign, CampaignError> {
        let campaign = self.get_campaign(user_id, campaign_id).await?;
        if !campaign.is_mutable() {
            return Err(CampaignError::NotDraft);
        }
        Ok(campaign)
    }

    /// Distinguish a missing campaign from one that left draft
    async fn draft_failure(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
    ) -> Result<CampaignError, CampaignError> {
        match self.campaign_repo.get_by_user(user_id, campaign_id).await? {
            Some(_) => Ok(CampaignError::NotDraft),
            None => Ok(CampaignError::NotFound),
        }
    }

    fn validate_schedule_time(scheduled_at: DateTime<Utc>) -> Result<(), CampaignError> {
        if scheduled_at <= Utc::now() {
            return Err(CampaignError::ScheduleInPast);
        }
        Ok(())
    }

    fn validate_required(field: &str, value: &str) -> Result<(), CampaignError> {
        if value.trim().is_empty() {
            return Err(CampaignError::Validation(format!(
                "{} must not be empty",
                field
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(CampaignManager::validate_required("name", "Launch").is_ok());
        assert!(CampaignManager::validate_required("name", "").is_err());
        assert!(CampaignManager::validate_required("name", "   ").is_err());
    }

    #[test]
    fn test_schedule_time_is_the_only_schedule_validation() {
        use chrono::Duration;

        // A future time passes; recipients are not a scheduling precondition
        assert!(
            CampaignManager::validate_schedule_time(Utc::now() + Duration::hours(1)).is_ok()
        );
        assert!(matches!(
            CampaignManager::validate_schedule_time(Utc::now() - Duration::seconds(1)),
            Err(CampaignError::ScheduleInPast)
        ));
    }
}
