//! Campaign repository

use chrono::{DateTime, Utc};
use letterpulse_common::types::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Campaign, CampaignStatus, CreateCampaign, UpdateCampaign};

/// Campaign repository
///
/// Every read and write is scoped to a user. Status transitions go through
/// conditional UPDATEs so concurrent writers cannot race past the state
/// machine; callers inspect the returned row count (or `Option`) to detect
/// a lost race.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    /// Create a new campaign repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new campaign in draft status
    pub async fn create(&self, input: CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let id = Uuid::new_v4();
        let tags = serde_json::to_value(input.tags.unwrap_or_default()).unwrap_or_default();

        sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                id, user_id, name, subject, from_address, from_name,
                html_body, text_body, track_opens, track_clicks,
                track_unsubscribes, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.subject)
        .bind(&input.from_address)
        .bind(&input.from_name)
        .bind(&input.html_body)
        .bind(&input.text_body)
        .bind(input.track_opens.unwrap_or(true))
        .bind(input.track_clicks.unwrap_or(true))
        .bind(input.track_unsubscribes.unwrap_or(true))
        .bind(&tags)
        .fetch_one(&self.pool)
        .await
    }

    /// Get a campaign by ID (any owner, including soft-deleted)
    pub async fn get(&self, id: Uuid) -> Result<Option<Campaign>, sqlx::Error> {
        sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Get a campaign by ID and owner
    pub async fn get_by_user(
        &self,
        user_id: UserId,
        id: Uuid,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE id = $1 AND user_id = $2 AND deleted = FALSE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List campaigns for a user
    pub async fn list_by_user(
        &self,
        user_id: UserId,
        status: Option<CampaignStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        if let Some(status) = status {
            sqlx::query_as::<_, Campaign>(
                r#"
                SELECT * FROM campaigns
                WHERE user_id = $1 AND status = $2 AND deleted = FALSE
                ORDER BY created_at DESC
                LIMIT $3 OFFSET $4
                "#,
            )
            .bind(user_id)
            .bind(status.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Campaign>(
                r#"
                SELECT * FROM campaigns
                WHERE user_id = $1 AND deleted = FALSE
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        }
    }

    /// Count campaigns for a user
    pub async fn count_by_user(
        &self,
        user_id: UserId,
        status: Option<CampaignStatus>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = if let Some(status) = status {
            sqlx::query_as(
                "SELECT COUNT(*) FROM campaigns WHERE user_id = $1 AND status = $2 AND deleted = FALSE",
            )
            .bind(user_id)
            .bind(status.to_string())
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_as("SELECT COUNT(*) FROM campaigns WHERE user_id = $1 AND deleted = FALSE")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(count.0)
    }

    /// Update a draft campaign
    ///
    /// The `status = 'draft'` guard is part of the UPDATE itself, so a
    /// campaign scheduled by a concurrent request cannot be modified here.
    /// Returns `None` when the row was not in draft (or not found).
    pub async fn update_draft(
        &self,
        id: Uuid,
        user_id: UserId,
        input: UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let tags = input
            .tags
            .map(|t| serde_json::to_value(t).unwrap_or_default());

        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                name = COALESCE($3, name),
                subject = COALESCE($4, subject),
                from_address = COALESCE($5, from_address),
                from_name = COALESCE($6, from_name),
                html_body = COALESCE($7, html_body),
                text_body = COALESCE($8, text_body),
                track_opens = COALESCE($9, track_opens),
                track_clicks = COALESCE($10, track_clicks),
                track_unsubscribes = COALESCE($11, track_unsubscribes),
                tags = COALESCE($12, tags),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'draft' AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.subject)
        .bind(&input.from_address)
        .bind(&input.from_name)
        .bind(&input.html_body)
        .bind(&input.text_body)
        .bind(input.track_opens)
        .bind(input.track_clicks)
        .bind(input.track_unsubscribes)
        .bind(&tags)
        .fetch_optional(&self.pool)
        .await
    }

    /// Transition a draft campaign to scheduled
    pub async fn schedule(
        &self,
        id: Uuid,
        user_id: UserId,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                status = 'scheduled',
                scheduled_at = $3,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'draft' AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(scheduled_at)
        .fetch_optional(&self.pool)
        .await
    }

    /// Transition a scheduled campaign to cancelled
    pub async fn cancel(
        &self,
        id: Uuid,
        user_id: UserId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                status = 'cancelled',
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'scheduled' AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Transition a campaign between arbitrary adjacent statuses
    ///
    /// Used by the send worker for `scheduled -> sending -> sent`. The
    /// caller validates the pair against the transition table first.
    pub async fn transition(
        &self,
        id: Uuid,
        from: CampaignStatus,
        to: CampaignStatus,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns SET
                status = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = $2 AND deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_optional(&self.pool)
        .await
    }

    /// Soft-delete a draft campaign
    pub async fn delete_draft(&self, id: Uuid, user_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE campaigns SET
                deleted = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'draft' AND deleted = FALSE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get campaigns whose scheduled time has passed
    pub async fn get_scheduled_ready(&self) -> Result<Vec<Campaign>, sqlx::Error> {
        sqlx::query_as::<_, Campaign>(
            r#"
            SELECT * FROM campaigns
            WHERE status = 'scheduled'
              AND scheduled_at IS NOT NULL
              AND scheduled_at <= NOW()
              AND deleted = FALSE
            ORDER BY scheduled_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
