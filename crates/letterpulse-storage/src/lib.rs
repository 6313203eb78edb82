//! Letterpulse Storage - Database abstraction
//!
//! This crate provides the PostgreSQL storage layer for Letterpulse:
//! connection pooling, models, and repositories for campaigns,
//! recipients, tracking events, and API keys.

pub mod db;
pub mod models;
pub mod repository;

pub use db::DatabasePool;
pub use models::*;
pub use repository::*;
