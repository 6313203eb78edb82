//! Letterpulse API - HTTP surface
//!
//! Public tracking endpoints (pixel, click redirect, unsubscribe, spam
//! complaint) plus the authenticated campaign management API.

pub mod auth;
pub mod handlers;
pub mod openapi;
pub mod routes;

pub use routes::create_router;
