//! Database models

use chrono::{DateTime, Utc};
use letterpulse_common::types::{CampaignId, EmailId, LinkId, SubscriberId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Campaign status
///
/// `Sent` and `Cancelled` are terminal. The `Scheduled -> Sending` and
/// `Sending -> Sent` transitions are driven by the external send worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sending,
    Sent,
    Cancelled,
}

impl CampaignStatus {
    /// Whether a transition from this status to `to` is legal
    pub fn can_transition(self, to: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, to),
            (Draft, Scheduled) | (Scheduled, Cancelled) | (Scheduled, Sending) | (Sending, Sent)
        )
    }

    /// Whether this status is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignStatus::Sent | CampaignStatus::Cancelled)
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Draft => write!(f, "draft"),
            CampaignStatus::Scheduled => write!(f, "scheduled"),
            CampaignStatus::Sending => write!(f, "sending"),
            CampaignStatus::Sent => write!(f, "sent"),
            CampaignStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "scheduled" => Ok(CampaignStatus::Scheduled),
            "sending" => Ok(CampaignStatus::Sending),
            "sent" => Ok(CampaignStatus::Sent),
            "cancelled" => Ok(CampaignStatus::Cancelled),
            _ => Err(format!("Invalid campaign status: {}", s)),
        }
    }
}

/// Campaign model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub user_id: UserId,
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
    pub tags: serde_json::Value,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Get status enum
    pub fn status_enum(&self) -> Option<CampaignStatus> {
        self.status.parse().ok()
    }

    /// Get tags as a vector
    pub fn tags_vec(&self) -> Vec<String> {
        serde_json::from_value(self.tags.clone()).unwrap_or_default()
    }

    /// Whether content, settings, and the recipient list may be mutated
    pub fn is_mutable(&self) -> bool {
        self.status_enum() == Some(CampaignStatus::Draft)
    }
}

/// Create campaign input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub user_id: UserId,
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

/// Update campaign input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCampaign {
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

/// Per-recipient delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeliveryStatus::Pending),
            "sent" => Ok(DeliveryStatus::Sent),
            "failed" => Ok(DeliveryStatus::Failed),
            _ => Err(format!("Invalid delivery status: {}", s)),
        }
    }
}

/// Campaign recipient model
///
/// One row per (campaign, subscriber); the unique constraint on that pair
/// makes recipient add idempotent per subscriber.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CampaignRecipient {
    pub id: uuid::Uuid,
    pub campaign_id: CampaignId,
    pub subscriber_id: SubscriberId,
    pub email: String,
    pub delivery_status: String,
    pub added_at: DateTime<Utc>,
}

impl CampaignRecipient {
    /// Get delivery status enum
    pub fn delivery_status_enum(&self) -> Option<DeliveryStatus> {
        self.delivery_status.parse().ok()
    }
}

/// Recipient add input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRecipient {
    pub subscriber_id: SubscriberId,
    pub email: String,
}

/// Tracking event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingEventType {
    Open,
    Click,
    Unsubscribe,
    SpamComplaint,
}

impl std::fmt::Display for TrackingEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingEventType::Open => write!(f, "open"),
            TrackingEventType::Click => write!(f, "click"),
            TrackingEventType::Unsubscribe => write!(f, "unsubscribe"),
            TrackingEventType::SpamComplaint => write!(f, "spam_complaint"),
        }
    }
}

impl std::str::FromStr for TrackingEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TrackingEventType::Open),
            "click" => Ok(TrackingEventType::Click),
            "unsubscribe" => Ok(TrackingEventType::Unsubscribe),
            "spam_complaint" => Ok(TrackingEventType::SpamComplaint),
            _ => Err(format!("Invalid tracking event type: {}", s)),
        }
    }
}

/// Tracking event model
///
/// Append-only: rows are never updated or deleted, and identical events
/// (e.g. repeated opens from an image-prefetching mail client) are all
/// recorded as independent rows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub id: uuid::Uuid,
    pub event_type: String,
    pub email_id: EmailId,
    pub subscriber_id: SubscriberId,
    pub campaign_id: CampaignId,
    pub link_id: Option<LinkId>,
    pub destination_url: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub complaint_type: Option<String>,
    pub feedback: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TrackingEvent {
    /// Get event type enum
    pub fn event_type_enum(&self) -> Option<TrackingEventType> {
        self.event_type.parse().ok()
    }
}

/// Create tracking event input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrackingEvent {
    pub event_type: TrackingEventType,
    pub email_id: EmailId,
    pub subscriber_id: SubscriberId,
    pub campaign_id: CampaignId,
    pub link_id: Option<LinkId>,
    pub destination_url: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub complaint_type: Option<String>,
    pub feedback: Option<String>,
}

/// Per-type event counts for one campaign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeCounts {
    pub opens: i64,
    pub clicks: i64,
    pub unsubscribes: i64,
    pub spam_complaints: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_campaign_status_roundtrip() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::Scheduled,
            CampaignStatus::Sending,
            CampaignStatus::Sent,
            CampaignStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<CampaignStatus>(), Ok(status));
        }
        assert!("paused".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn test_transition_table() {
        use CampaignStatus::*;

        assert!(Draft.can_transition(Scheduled));
        assert!(Scheduled.can_transition(Cancelled));
        assert!(Scheduled.can_transition(Sending));
        assert!(Sending.can_transition(Sent));

        // Cancel is only legal from scheduled
        assert!(!Draft.can_transition(Cancelled));
        assert!(!Sending.can_transition(Cancelled));

        // Terminal states go nowhere
        for to in [Draft, Scheduled, Sending, Sent, Cancelled] {
            assert!(!Sent.can_transition(to));
            assert!(!Cancelled.can_transition(to));
        }
    }

    #[test]
    fn test_event_type_roundtrip() {
        for ty in [
            TrackingEventType::Open,
            TrackingEventType::Click,
            TrackingEventType::Unsubscribe,
            TrackingEventType::SpamComplaint,
        ] {
            assert_eq!(ty.to_string().parse::<TrackingEventType>(), Ok(ty));
        }
    }
}
