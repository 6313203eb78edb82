//! Campaign analytics

pub mod aggregator;

pub use aggregator::{AnalyticsAggregator, CampaignAnalytics};
