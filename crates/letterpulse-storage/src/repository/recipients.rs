//! Campaign recipient repository

use letterpulse_common::types::SubscriberId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AddRecipient, CampaignRecipient};

/// Campaign recipient repository
#[derive(Clone)]
pub struct RecipientRepository {
    pool: PgPool,
}

impl RecipientRepository {
    /// Create a new recipient repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add recipients to a campaign in batch
    ///
    /// Duplicate (campaign, subscriber) pairs are skipped via ON CONFLICT,
    /// so re-submitting the same batch is harmless. Returns the number of
    /// rows actually inserted.
    pub async fn add_batch(
        &self,
        campaign_id: Uuid,
        recipients: &[AddRecipient],
    ) -> Result<u64, sqlx::Error> {
        let mut count = 0u64;

        let mut tx = self.pool.begin().await?;

        for recipient in recipients {
            let id = Uuid::new_v4();

            let result = sqlx::query(
                r#"
                INSERT INTO campaign_recipients (id, campaign_id, subscriber_id, email)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (campaign_id, subscriber_id) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(campaign_id)
            .bind(recipient.subscriber_id)
            .bind(&recipient.email)
            .execute(&mut *tx)
            .await?;

            count += result.rows_affected();
        }

        tx.commit().await?;
        Ok(count)
    }

    /// Remove recipients from a campaign by subscriber ID
    pub async fn remove(
        &self,
        campaign_id: Uuid,
        subscriber_ids: &[SubscriberId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM campaign_recipients WHERE campaign_id = $1 AND subscriber_id = ANY($2)",
        )
        .bind(campaign_id)
        .bind(subscriber_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Get a recipient by campaign and subscriber
    pub async fn get(
        &self,
        campaign_id: Uuid,
        subscriber_id: SubscriberId,
    ) -> Result<Option<CampaignRecipient>, sqlx::Error> {
        sqlx::query_as::<_, CampaignRecipient>(
            "SELECT * FROM campaign_recipients WHERE campaign_id = $1 AND subscriber_id = $2",
        )
        .bind(campaign_id)
        .bind(subscriber_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List recipients for a campaign
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CampaignRecipient>, sqlx::Error> {
        sqlx::query_as::<_, CampaignRecipient>(
            r#"
            SELECT * FROM campaign_recipients
            WHERE campaign_id = $1
            ORDER BY added_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(campaign_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Count recipients for a campaign
    pub async fn count_by_campaign(&self, campaign_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM campaign_recipients WHERE campaign_id = $1")
                .bind(campaign_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    /// Mark a recipient's delivery status
    pub async fn update_delivery_status(
        &self,
        campaign_id: Uuid,
        subscriber_id: SubscriberId,
        status: crate::models::DeliveryStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE campaign_recipients SET
                delivery_status = $3
            WHERE campaign_id = $1 AND subscriber_id = $2
            "#,
        )
        .bind(campaign_id)
        .bind(subscriber_id)
        .bind(status.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
