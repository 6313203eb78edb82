//! Letterpulse Core - Tracking, campaign lifecycle, and analytics
//!
//! This crate holds the delivery tracking engine: the tracking token codec,
//! the event recorder, the campaign lifecycle manager, and the analytics
//! aggregator. It depends on the storage layer but knows nothing about HTTP.

pub mod analytics;
pub mod campaign;
pub mod metrics;
pub mod tracking;

pub use analytics::{AnalyticsAggregator, CampaignAnalytics};
pub use campaign::{AddRecipientsResult, CampaignError, CampaignManager};
pub use metrics::TrackingMetrics;
pub use tracking::{TrackingIdentity, TrackingRecorder};
