//! Analytics Aggregator - Derives campaign engagement metrics from raw events

use letterpulse_common::types::UserId;
use letterpulse_storage::db::DatabasePool;
use letterpulse_storage::models::EventTypeCounts;
use letterpulse_storage::repository::{
    CampaignRepository, RecipientRepository, TrackingEventRepository,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::campaign::CampaignError;

/// Derived engagement metrics for one campaign
///
/// Rates are percentages of the recipient count, computed from total event
/// counts. Repeated opens by the same subscriber are all counted, so rates
/// above 100% are possible and meaningful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignAnalytics {
    pub campaign_id: Uuid,
    pub status: String,
    pub total_sent: i64,
    pub total_opened: i64,
    pub total_clicked: i64,
    pub total_unsubscribed: i64,
    pub total_complained: i64,
    pub open_rate: f64,
    pub click_rate: f64,
    pub unsubscribe_rate: f64,
}

/// Analytics Aggregator - Computes campaign analytics on demand
#[derive(Clone)]
pub struct AnalyticsAggregator {
    campaign_repo: CampaignRepository,
    recipient_repo: RecipientRepository,
    event_repo: TrackingEventRepository,
}

impl AnalyticsAggregator {
    /// Create a new aggregator
    pub fn new(db_pool: &DatabasePool) -> Self {
        let pool = db_pool.pool().clone();
        Self {
            campaign_repo: CampaignRepository::new(pool.clone()),
            recipient_repo: RecipientRepository::new(pool.clone()),
            event_repo: TrackingEventRepository::new(pool),
        }
    }

    /// Get analytics for a campaign owned by a user
    pub async fn campaign_analytics(
        &self,
        user_id: UserId,
        campaign_id: Uuid,
    ) -> Result<CampaignAnalytics, CampaignError> {
        let campaign = self
            .campaign_repo
            .get_by_user(user_id, campaign_id)
            .await?
            .ok_or(CampaignError::NotFound)?;

        let recipient_count = self.recipient_repo.count_by_campaign(campaign_id).await?;
        let counts = self.event_repo.counts_by_campaign(campaign_id).await?;

        Ok(summarize(
            campaign_id,
            campaign.status,
            recipient_count,
            counts,
        ))
    }
}

/// Compute engagement rates from raw counts
///
/// A campaign with no recipients reports all rates as zero rather than
/// dividing by zero.
pub fn summarize(
    campaign_id: Uuid,
    status: String,
    recipient_count: i64,
    counts: EventTypeCounts,
) -> CampaignAnalytics {
    let rate = |count: i64| {
        if recipient_count > 0 {
            count as f64 / recipient_count as f64 * 100.0
        } else {
            0.0
        }
    };

    CampaignAnalytics {
        campaign_id,
        status,
        total_sent: recipient_count,
        total_opened: counts.opens,
        total_clicked: counts.clicks,
        total_unsubscribed: counts.unsubscribes,
        total_complained: counts.spam_complaints,
        open_rate: rate(counts.opens),
        click_rate: rate(counts.clicks),
        unsubscribe_rate: rate(counts.unsubscribes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarize_rates() {
        let counts = EventTypeCounts {
            opens: 150,
            clicks: 40,
            unsubscribes: 2,
            spam_complaints: 1,
        };
        let analytics = summarize(Uuid::new_v4(), "sent".to_string(), 200, counts);

        assert_eq!(analytics.total_sent, 200);
        assert_eq!(analytics.open_rate, 75.0);
        assert_eq!(analytics.click_rate, 20.0);
        assert_eq!(analytics.unsubscribe_rate, 1.0);
        assert_eq!(analytics.total_complained, 1);
    }

    #[test]
    fn test_summarize_rates_can_exceed_100() {
        let counts = EventTypeCounts {
            opens: 250,
            ..Default::default()
        };
        let analytics = summarize(Uuid::new_v4(), "sent".to_string(), 100, counts);
        assert_eq!(analytics.open_rate, 250.0);
    }

    #[test]
    fn test_summarize_zero_recipients() {
        let counts = EventTypeCounts {
            opens: 5,
            clicks: 3,
            unsubscribes: 1,
            spam_complaints: 0,
        };
        let analytics = summarize(Uuid::new_v4(), "draft".to_string(), 0, counts);

        assert_eq!(analytics.open_rate, 0.0);
        assert_eq!(analytics.click_rate, 0.0);
        assert_eq!(analytics.unsubscribe_rate, 0.0);
        // Raw counts are still reported
        assert_eq!(analytics.total_opened, 5);
    }
}
