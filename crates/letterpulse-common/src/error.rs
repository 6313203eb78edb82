//! Error types for Letterpulse

use thiserror::Error;

/// Main error type for Letterpulse
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed tracking token: {0}")]
    MalformedTrackingToken(String),

    #[error("Malformed redirect URL: {0}")]
    MalformedRedirectUrl(String),

    #[error("Invalid campaign state: {0}")]
    InvalidCampaignState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Letterpulse
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 500,
            Error::Database(_) => 500,
            Error::Storage(_) => 500,
            Error::Validation(_) => 400,
            Error::MalformedTrackingToken(_) => 400,
            Error::MalformedRedirectUrl(_) => 400,
            Error::InvalidCampaignState(_) => 400,
            Error::NotFound(_) => 404,
            Error::PermissionDenied(_) => 403,
            Error::Internal(_) => 500,
            Error::Other(_) => 500,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::MalformedTrackingToken(_) => "MALFORMED_TRACKING_TOKEN",
            Error::MalformedRedirectUrl(_) => "MALFORMED_REDIRECT_URL",
            Error::InvalidCampaignState(_) => "INVALID_CAMPAIGN_STATE",
            Error::NotFound(_) => "NOT_FOUND",
            Error::PermissionDenied(_) => "FORBIDDEN",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Validation("bad".into()).status_code(), 400);
        assert_eq!(Error::MalformedTrackingToken("x".into()).status_code(), 400);
        assert_eq!(Error::MalformedRedirectUrl("x".into()).status_code(), 400);
        assert_eq!(Error::InvalidCampaignState("x".into()).status_code(), 400);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::Storage("x".into()).status_code(), 500);
    }

    #[test]
    fn test_token_and_url_errors_are_distinct() {
        assert_ne!(
            Error::MalformedTrackingToken("x".into()).code(),
            Error::MalformedRedirectUrl("x".into()).code()
        );
    }
}
