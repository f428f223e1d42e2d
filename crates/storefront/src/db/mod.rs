//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `tenantmart`
//!
//! The content platform owns products; this database owns:
//!
//! ## Tables
//!
//! - `tenants` - Store scopes keyed by slug (and optional custom domain)
//! - `orders` - Customer orders, scoped to a tenant and an identity-provider user
//! - `tower_sessions.session` - Tower-sessions storage (cart and wishlist)
//!
//! The database is optional. Without one the storefront serves the built-in
//! tenants, shows no orders and keeps sessions in memory.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p tenantmart-cli -- migrate
//! ```

pub mod orders;
pub mod tenants;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::{CustomerSummary, OrderRepository, OrderSummary};
pub use tenants::TenantRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
