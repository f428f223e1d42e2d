//! Database migration command.
//!
//! Applies `crates/storefront/migrations/` and creates the session store
//! table used by `tower-sessions`.

use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run storefront migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(pool).await?;

    tracing::info!("Creating session store table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
