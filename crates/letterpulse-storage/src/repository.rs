//! Repository layer

pub mod api_keys;
pub mod campaigns;
pub mod events;
pub mod recipients;

pub use api_keys::{ApiKeyRepository, PgApiKeyRepository};
pub use campaigns::CampaignRepository;
pub use events::TrackingEventRepository;
pub use recipients::RecipientRepository;
