//! Tenant management commands.

use sqlx::PgPool;

use tenantmart_core::Slug;
use tenantmart_storefront::db::TenantRepository;

use super::CommandError;

/// Register a tenant.
///
/// # Errors
///
/// Returns an error if the slug is malformed, the domain is blank, or the
/// slug or domain is already taken.
pub async fn add(
    pool: &PgPool,
    slug: &str,
    name: &str,
    domain: Option<&str>,
) -> Result<(), CommandError> {
    let slug = Slug::parse(slug)?;

    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::InvalidArgument("name must not be blank".to_string()));
    }

    let domain = domain.map(|d| d.trim().to_ascii_lowercase());
    if domain.as_deref().is_some_and(str::is_empty) {
        return Err(CommandError::InvalidArgument("domain must not be blank".to_string()));
    }

    let tenant = TenantRepository::new(pool)
        .create(&slug, name, domain.as_deref())
        .await?;

    tracing::info!(
        id = %tenant.id,
        slug = %tenant.slug,
        domain = tenant.domain.as_deref().unwrap_or("-"),
        "Tenant created"
    );
    Ok(())
}

/// List tenants.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list(pool: &PgPool) -> Result<(), CommandError> {
    let tenants = TenantRepository::new(pool).list().await?;

    if tenants.is_empty() {
        tracing::info!("No tenants. Run `tm-cli seed` or `tm-cli tenant add`.");
    }
    for tenant in tenants {
        tracing::info!(
            "{:<24} {:<32} {}",
            tenant.slug,
            tenant.name,
            tenant.domain.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
