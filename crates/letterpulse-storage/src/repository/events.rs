//! Tracking event repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateTrackingEvent, EventTypeCounts, TrackingEvent, TrackingEventType};

/// Tracking event repository
///
/// The events table is append-only; this repository exposes inserts and
/// reads but no update or delete.
#[derive(Clone)]
pub struct TrackingEventRepository {
    pool: PgPool,
}

impl TrackingEventRepository {
    /// Create a new tracking event repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a tracking event
    pub async fn insert(&self, input: CreateTrackingEvent) -> Result<TrackingEvent, sqlx::Error> {
        let id = Uuid::new_v4();

        sqlx::query_as::<_, TrackingEvent>(
            r#"
            INSERT INTO tracking_events (
                id, event_type, email_id, subscriber_id, campaign_id, link_id,
                destination_url, ip_address, user_agent, complaint_type, feedback
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.event_type.to_string())
        .bind(input.email_id)
        .bind(input.subscriber_id)
        .bind(input.campaign_id)
        .bind(input.link_id)
        .bind(&input.destination_url)
        .bind(&input.ip_address)
        .bind(&input.user_agent)
        .bind(&input.complaint_type)
        .bind(&input.feedback)
        .fetch_one(&self.pool)
        .await
    }

    /// Count events per type for a campaign
    pub async fn counts_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<EventTypeCounts, sqlx::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT event_type, COUNT(*) FROM tracking_events
            WHERE campaign_id = $1
            GROUP BY event_type
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = EventTypeCounts::default();
        for (event_type, count) in rows {
            match event_type.parse::<TrackingEventType>() {
                Ok(TrackingEventType::Open) => counts.opens = count,
                Ok(TrackingEventType::Click) => counts.clicks = count,
                Ok(TrackingEventType::Unsubscribe) => counts.unsubscribes = count,
                Ok(TrackingEventType::SpamComplaint) => counts.spam_complaints = count,
                Err(_) => {}
            }
        }
        Ok(counts)
    }

    /// List events for a campaign, newest first
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
        event_type: Option<TrackingEventType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackingEvent>, sqlx::Error> {
        if let Some(event_type) = event_type {
            sqlx::query_as::<_, TrackingEvent>(
                r#"
                SELECT * FROM tracking_events
                WHERE campaign_id = $1 AND event_type = $2
                ORDER BY occurred_at DESC
                LIMIT $3 OFFSET $4
                "#,
            )
            .bind(campaign_id)
            .bind(event_type.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, TrackingEvent>(
                r#"
                SELECT * FROM tracking_events
                WHERE campaign_id = $1
                ORDER BY occurred_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(campaign_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        }
    }
}
