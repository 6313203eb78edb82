//! Delivery tracking: token codec, pixel, and event recorder

pub mod codec;
pub mod pixel;
pub mod recorder;

pub use codec::{
    decode_redirect_url, decode_token, encode_redirect_url, encode_token, TrackingIdentity,
};
pub use pixel::TRACKING_PIXEL;
pub use recorder::TrackingRecorder;
