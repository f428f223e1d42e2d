//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod tenant;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use tenantmart_core::SlugError;
use tenantmart_storefront::db::{self, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Invalid tenant slug.
    #[error("Invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Connect to the storefront database named in the environment.
///
/// # Errors
///
/// Returns an error if no database URL is set or the connection fails.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&database_url).await?)
}
