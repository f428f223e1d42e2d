//! Seed the database with the built-in demo tenants.

use sqlx::PgPool;

use tenantmart_storefront::db::{RepositoryError, TenantRepository};
use tenantmart_storefront::services::tenants::builtin_tenants;

use super::CommandError;

/// Insert each built-in tenant, skipping ones that already exist.
///
/// # Errors
///
/// Returns an error if an insert fails for a reason other than a duplicate.
pub async fn run(pool: &PgPool) -> Result<(), CommandError> {
    let repo = TenantRepository::new(pool);

    for tenant in builtin_tenants() {
        match repo.create(&tenant.slug, &tenant.name, None).await {
            Ok(created) => tracing::info!(slug = %created.slug, "Seeded tenant"),
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!(slug = %tenant.slug, "Tenant already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("Seed complete!");
    Ok(())
}
