//! Campaign lifecycle management

pub mod manager;

pub use manager::{AddRecipientsResult, CampaignError, CampaignManager};
