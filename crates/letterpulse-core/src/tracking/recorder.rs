//! Tracking event recorder

use letterpulse_common::types::RequestMeta;
use letterpulse_common::{Error, Result};
use letterpulse_storage::db::DatabasePool;
use letterpulse_storage::models::{CreateTrackingEvent, TrackingEvent, TrackingEventType};
use letterpulse_storage::repository::{CampaignRepository, TrackingEventRepository};
use tracing::{debug, warn};

use crate::metrics::TrackingMetrics;
use crate::tracking::TrackingIdentity;

/// Accepted spam complaint categories
pub const COMPLAINT_TYPES: &[&str] = &["spam", "abuse", "other"];

/// Records tracking events against the append-only event log
///
/// Opens and clicks are best-effort: a storage failure is logged and
/// counted but never surfaces to the caller, because the pixel and the
/// redirect must succeed regardless. Unsubscribes and spam complaints are
/// synchronous and propagate failures.
#[derive(Clone)]
pub struct TrackingRecorder {
    events: TrackingEventRepository,
    campaigns: CampaignRepository,
    metrics: TrackingMetrics,
}

impl TrackingRecorder {
    /// Create a new recorder
    pub fn new(db_pool: &DatabasePool, metrics: TrackingMetrics) -> Self {
        let pool = db_pool.pool().clone();
        Self {
            events: TrackingEventRepository::new(pool.clone()),
            campaigns: CampaignRepository::new(pool),
            metrics,
        }
    }

    /// Record an open event, best-effort
    ///
    /// Skipped silently when the campaign has open tracking disabled.
    pub async fn record_open(&self, identity: &TrackingIdentity, meta: &RequestMeta) {
        if !self.tracking_enabled(identity, |c| c.track_opens).await {
            return;
        }

        let input = CreateTrackingEvent {
            event_type: TrackingEventType::Open,
            email_id: identity.email_id,
            subscriber_id: identity.subscriber_id,
            campaign_id: identity.campaign_id,
            link_id: None,
            destination_url: None,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            complaint_type: None,
            feedback: None,
        };

        self.record_best_effort(input).await;
    }

    /// Record a click event, best-effort
    pub async fn record_click(
        &self,
        identity: &TrackingIdentity,
        destination_url: &str,
        meta: &RequestMeta,
    ) {
        if !self.tracking_enabled(identity, |c| c.track_clicks).await {
            return;
        }

        let input = CreateTrackingEvent {
            event_type: TrackingEventType::Click,
            email_id: identity.email_id,
            subscriber_id: identity.subscriber_id,
            campaign_id: identity.campaign_id,
            link_id: identity.link_id,
            destination_url: Some(destination_url.to_string()),
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            complaint_type: None,
            feedback: None,
        };

        self.record_best_effort(input).await;
    }

    /// Record an unsubscribe event
    ///
    /// Synchronous: the caller needs to know the request was durably
    /// recorded before acknowledging it.
    pub async fn record_unsubscribe(
        &self,
        identity: &TrackingIdentity,
        reason: Option<String>,
        meta: &RequestMeta,
    ) -> Result<TrackingEvent> {
        let input = CreateTrackingEvent {
            event_type: TrackingEventType::Unsubscribe,
            email_id: identity.email_id,
            subscriber_id: identity.subscriber_id,
            campaign_id: identity.campaign_id,
            link_id: None,
            destination_url: None,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            complaint_type: None,
            feedback: reason,
        };

        self.record_synchronous(input).await
    }

    /// Record a spam complaint event
    ///
    /// `complaint_type`, when present, must be one of `COMPLAINT_TYPES`.
    pub async fn record_spam_complaint(
        &self,
        identity: &TrackingIdentity,
        complaint_type: Option<String>,
        feedback: Option<String>,
        meta: &RequestMeta,
    ) -> Result<TrackingEvent> {
        if let Some(ref ty) = complaint_type {
            if !COMPLAINT_TYPES.contains(&ty.as_str()) {
                return Err(Error::Validation(format!("Invalid complaint type: {}", ty)));
            }
        }

        let input = CreateTrackingEvent {
            event_type: TrackingEventType::SpamComplaint,
            email_id: identity.email_id,
            subscriber_id: identity.subscriber_id,
            campaign_id: identity.campaign_id,
            link_id: None,
            destination_url: None,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            complaint_type,
            feedback,
        };

        self.record_synchronous(input).await
    }

    /// Metrics handle, shared with the HTTP layer
    pub fn metrics(&self) -> &TrackingMetrics {
        &self.metrics
    }

    /// Check a campaign tracking flag
    ///
    /// An unknown campaign or a lookup failure counts as enabled: losing a
    /// real event is worse than storing one for a vanished campaign.
    async fn tracking_enabled<F>(&self, identity: &TrackingIdentity, flag: F) -> bool
    where
        F: Fn(&letterpulse_storage::models::Campaign) -> bool,
    {
        match self.campaigns.get(identity.campaign_id).await {
            Ok(Some(campaign)) => flag(&campaign),
            Ok(None) => true,
            Err(e) => {
                warn!(campaign_id = %identity.campaign_id, "Campaign flag lookup failed: {}", e);
                true
            }
        }
    }

    async fn record_best_effort(&self, input: CreateTrackingEvent) {
        let event_type = input.event_type.to_string();
        match self.events.insert(input).await {
            Ok(event) => {
                debug!(event_id = %event.id, event_type = %event_type, "Tracking event recorded");
                self.metrics.event_recorded(&event_type);
            }
            Err(e) => {
                warn!(event_type = %event_type, "Dropped tracking event: {}", e);
                self.metrics.event_dropped(&event_type);
            }
        }
    }

    async fn record_synchronous(&self, input: CreateTrackingEvent) -> Result<TrackingEvent> {
        let event_type = input.event_type.to_string();
        let event = self
            .events
            .insert(input)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        debug!(event_id = %event.id, event_type = %event_type, "Tracking event recorded");
        self.metrics.event_recorded(&event_type);
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complaint_types() {
        assert!(COMPLAINT_TYPES.contains(&"spam"));
        assert!(COMPLAINT_TYPES.contains(&"abuse"));
        assert!(COMPLAINT_TYPES.contains(&"other"));
        assert!(!COMPLAINT_TYPES.contains(&"phishing"));
    }
}
