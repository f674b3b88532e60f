//! Newsdesk Database Layer
//!
//! This crate provides the persistence layer for Newsdesk: users (the
//! credential store), news articles and their comments, stored in SQLite
//! via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{Database, NewsQuery, PoolSettings};

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
