//! Tracking token codec
//!
//! A tracking token carries the identity of one delivered message through an
//! opaque URL-safe string embedded in tracking pixels, rewritten links, and
//! unsubscribe forms. Layout, before base64:
//!
//! ```text
//! [version: 1][flags: 1][email_id: 16][subscriber_id: 16][campaign_id: 16]
//! [link_id: 16, only when flags bit 0 is set][checksum: 4]
//! ```
//!
//! The checksum is the first 4 bytes of SHA-256 over everything before it.
//! It catches truncation and copy-paste corruption; it is not an
//! authenticity guarantee.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use letterpulse_common::types::{CampaignId, EmailId, LinkId, SubscriberId};
use letterpulse_common::{Error, Result};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const TOKEN_VERSION: u8 = 0x01;
const FLAG_HAS_LINK: u8 = 0b0000_0001;
const CHECKSUM_LEN: usize = 4;
const BASE_LEN: usize = 1 + 1 + 16 * 3;

/// Identity of one delivered message, as carried inside a tracking token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingIdentity {
    pub email_id: EmailId,
    pub subscriber_id: SubscriberId,
    pub campaign_id: CampaignId,
    pub link_id: Option<LinkId>,
}

impl TrackingIdentity {
    pub fn new(email_id: EmailId, subscriber_id: SubscriberId, campaign_id: CampaignId) -> Self {
        Self {
            email_id,
            subscriber_id,
            campaign_id,
            link_id: None,
        }
    }

    pub fn with_link(mut self, link_id: LinkId) -> Self {
        self.link_id = Some(link_id);
        self
    }
}

/// Encode a tracking identity into an opaque URL-safe token
pub fn encode_token(identity: &TrackingIdentity) -> String {
    let mut buf = Vec::with_capacity(BASE_LEN + 16 + CHECKSUM_LEN);

    buf.push(TOKEN_VERSION);
    buf.push(if identity.link_id.is_some() {
        FLAG_HAS_LINK
    } else {
        0
    });
    buf.extend_from_slice(identity.email_id.as_bytes());
    buf.extend_from_slice(identity.subscriber_id.as_bytes());
    buf.extend_from_slice(identity.campaign_id.as_bytes());
    if let Some(link_id) = identity.link_id {
        buf.extend_from_slice(link_id.as_bytes());
    }

    let checksum = checksum(&buf);
    buf.extend_from_slice(&checksum);

    URL_SAFE_NO_PAD.encode(&buf)
}

/// Decode a tracking token back into its identity
///
/// Any defect yields `Error::MalformedTrackingToken`: bad base64, wrong
/// version, wrong length for the flagged layout, or checksum mismatch.
pub fn decode_token(token: &str) -> Result<TrackingIdentity> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| malformed("invalid base64"))?;

    if bytes.len() < 2 {
        return Err(malformed("too short"));
    }
    if bytes[0] != TOKEN_VERSION {
        return Err(malformed("unknown version"));
    }

    let flags = bytes[1];
    if flags & !FLAG_HAS_LINK != 0 {
        return Err(malformed("unknown flags"));
    }

    let has_link = flags & FLAG_HAS_LINK != 0;
    let expected_len = if has_link {
        BASE_LEN + 16 + CHECKSUM_LEN
    } else {
        BASE_LEN + CHECKSUM_LEN
    };
    if bytes.len() != expected_len {
        return Err(malformed("bad length"));
    }

    let (payload, stored) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    if checksum(payload) != stored {
        return Err(malformed("checksum mismatch"));
    }

    let email_id = read_uuid(&payload[2..18]);
    let subscriber_id = read_uuid(&payload[18..34]);
    let campaign_id = read_uuid(&payload[34..50]);
    let link_id = if has_link {
        Some(read_uuid(&payload[50..66]))
    } else {
        None
    };

    Ok(TrackingIdentity {
        email_id,
        subscriber_id,
        campaign_id,
        link_id,
    })
}

/// Encode a click destination URL for the redirect query parameter
pub fn encode_redirect_url(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}

/// Decode a click destination URL
///
/// Only `http` and `https` destinations are accepted; anything else (or
/// undecodable input) yields `Error::MalformedRedirectUrl`. Control
/// characters are rejected so the decoded value is always usable as a
/// `Location` header without splitting the response.
pub fn decode_redirect_url(encoded: &str) -> Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| Error::MalformedRedirectUrl("invalid base64".to_string()))?;
    let url = String::from_utf8(bytes)
        .map_err(|_| Error::MalformedRedirectUrl("invalid UTF-8".to_string()))?;

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::MalformedRedirectUrl(
            "destination must be http or https".to_string(),
        ));
    }
    if url.bytes().any(|b| b.is_ascii_control()) {
        return Err(Error::MalformedRedirectUrl(
            "destination contains control characters".to_string(),
        ));
    }

    Ok(url)
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let hash = hasher.finalize();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

fn read_uuid(bytes: &[u8]) -> Uuid {
    let mut buf = [0u8; 16];
    buf.copy_from_slice(bytes);
    Uuid::from_bytes(buf)
}

fn malformed(detail: &str) -> Error {
    Error::MalformedTrackingToken(detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity() -> TrackingIdentity {
        TrackingIdentity::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_token_roundtrip() {
        let id = identity();
        let token = encode_token(&id);
        assert_eq!(decode_token(&token).unwrap(), id);
    }

    #[test]
    fn test_token_roundtrip_with_link() {
        let id = identity().with_link(Uuid::new_v4());
        let token = encode_token(&id);
        assert_eq!(decode_token(&token).unwrap(), id);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_token(&identity().with_link(Uuid::new_v4()));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_token("not base64!!"),
            Err(Error::MalformedTrackingToken(_))
        ));
        assert!(matches!(
            decode_token(""),
            Err(Error::MalformedTrackingToken(_))
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let token = encode_token(&identity());
        assert!(decode_token(&token[..token.len() - 4]).is_err());
    }

    #[test]
    fn test_decode_tampered_checksum() {
        let id = identity();
        let mut bytes = URL_SAFE_NO_PAD.decode(encode_token(&id)).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let tampered = URL_SAFE_NO_PAD.encode(&bytes);
        assert!(matches!(
            decode_token(&tampered),
            Err(Error::MalformedTrackingToken(_))
        ));
    }

    #[test]
    fn test_decode_tampered_payload() {
        let id = identity();
        let mut bytes = URL_SAFE_NO_PAD.decode(encode_token(&id)).unwrap();
        // Flip a bit inside the campaign ID
        bytes[40] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(&bytes);
        assert!(decode_token(&tampered).is_err());
    }

    #[test]
    fn test_decode_unknown_version() {
        let id = identity();
        let mut bytes = URL_SAFE_NO_PAD.decode(encode_token(&id)).unwrap();
        bytes[0] = 0x7F;
        let token = URL_SAFE_NO_PAD.encode(&bytes);
        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn test_redirect_url_roundtrip() {
        let url = "https://example.com/page?a=1&b=2";
        assert_eq!(decode_redirect_url(&encode_redirect_url(url)).unwrap(), url);
    }

    #[test]
    fn test_redirect_url_rejects_bad_scheme() {
        let encoded = encode_redirect_url("javascript:alert(1)");
        assert!(matches!(
            decode_redirect_url(&encoded),
            Err(Error::MalformedRedirectUrl(_))
        ));
    }

    #[test]
    fn test_redirect_url_rejects_control_characters() {
        let encoded = encode_redirect_url("https://example.com\r\nSet-Cookie: a=b");
        assert!(matches!(
            decode_redirect_url(&encoded),
            Err(Error::MalformedRedirectUrl(_))
        ));
    }

    #[test]
    fn test_redirect_url_rejects_garbage() {
        assert!(matches!(
            decode_redirect_url("%%%"),
            Err(Error::MalformedRedirectUrl(_))
        ));
    }
}
