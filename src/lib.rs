//! # urlkey
//!
//! A URL shortener that maps long URLs to fixed-length random keys, built
//! with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Short keys, mappings, error taxonomy and the store trait
//! - **Application Layer** ([`application`]) - Key allocation with collision retry
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite and in-memory stores, Redis cache
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - 7-character keys drawn from `[A-Za-z0-9]`
//! - Idempotent shortening: a URL keeps the key it was first given
//! - Bounded collision retry with per-request deadlines
//! - Optional Redis caching for redirects
//!
//! ## Quick Start
//!
//! ```bash
//! export APP_BASE_URL="http://localhost:8080"
//! export DB_PATH="./data/urls.db"
//!
//! # Migrations run on startup
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{Allocation, AllocationService};
    pub use crate::domain::entities::{ShortKey, UrlMapping};
    pub use crate::domain::errors::{AllocationError, StoreError};
    pub use crate::domain::repositories::MappingStore;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
