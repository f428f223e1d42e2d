//! Tenant resolution.
//!
//! A tenant is addressed by the first path segment (`/{store_slug}/...`) or,
//! for the home page, by a custom domain. Tenants live in the `tenants`
//! table; without a database the built-in demo tenants are served.

use sqlx::PgPool;
use uuid::Uuid;

use tenantmart_core::{Slug, Tenant, TenantId};

use crate::db::{RepositoryError, TenantRepository};

/// First path segments that never name a tenant.
pub const SYSTEM_SEGMENTS: &[&str] = &[
    "admin",
    "sign-in",
    "sign-up",
    "api",
    "studio",
    "products",
    "cart",
    "checkout",
    "orders",
    "wishlist",
    "profile",
    "dashboard",
    "static",
    "health",
];

/// The tenant slug a path addresses, if any.
///
/// ```
/// use tenantmart_storefront::services::tenants::extract_tenant_slug;
///
/// assert_eq!(extract_tenant_slug("/demo-store/products"), Some("demo-store"));
/// assert_eq!(extract_tenant_slug("/admin/orders"), None);
/// ```
#[must_use]
pub fn extract_tenant_slug(path: &str) -> Option<&str> {
    let segment = path.split('/').find(|segment| !segment.is_empty())?;
    if SYSTEM_SEGMENTS.contains(&segment) {
        None
    } else {
        Some(segment)
    }
}

/// Built-in tenants served when no database is configured.
///
/// `tm-cli seed` inserts the same stores into a fresh database.
#[must_use]
pub fn builtin_tenants() -> Vec<Tenant> {
    [
        (1_u128, "demo-store", "Demo Store"),
        (2_u128, "example", "Example Store"),
    ]
    .into_iter()
    .filter_map(|(id, slug, name)| {
        Some(Tenant {
            id: TenantId::new(Uuid::from_u128(id)),
            slug: Slug::parse(slug).ok()?,
            name: name.to_string(),
            domain: None,
            created_at: None,
        })
    })
    .collect()
}

/// Looks tenants up in the database, or among the built-ins.
#[derive(Clone)]
pub struct TenantDirectory {
    pool: Option<PgPool>,
}

impl TenantDirectory {
    #[must_use]
    pub const fn new(pool: Option<PgPool>) -> Self {
        Self { pool }
    }

    /// Resolve a tenant by slug. Malformed slugs resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, RepositoryError> {
        let Ok(slug) = Slug::parse(slug) else {
            return Ok(None);
        };

        match &self.pool {
            Some(pool) => TenantRepository::new(pool).get_by_slug(&slug).await,
            None => Ok(builtin_tenants().into_iter().find(|t| t.slug == slug)),
        }
    }

    /// Resolve the tenant whose custom domain is the given `Host` value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn find_by_host(&self, host: &str) -> Result<Option<Tenant>, RepositoryError> {
        let domain = host.split(':').next().unwrap_or(host).trim();
        if domain.is_empty() {
            return Ok(None);
        }

        match &self.pool {
            Some(pool) => TenantRepository::new(pool).get_by_domain(domain).await,
            None => Ok(builtin_tenants().into_iter().find(|t| t.serves_host(domain))),
        }
    }

    /// Every known tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails.
    pub async fn list(&self) -> Result<Vec<Tenant>, RepositoryError> {
        match &self.pool {
            Some(pool) => TenantRepository::new(pool).list().await,
            None => Ok(builtin_tenants()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tenant_slug() {
        assert_eq!(extract_tenant_slug("/demo-store"), Some("demo-store"));
        assert_eq!(extract_tenant_slug("/demo-store/products/mug"), Some("demo-store"));
        assert_eq!(extract_tenant_slug("//example/"), Some("example"));
    }

    #[test]
    fn test_extract_tenant_slug_system_segments() {
        for path in ["/admin", "/sign-in/factor-one", "/api/cart", "/studio", "/products", "/cart"] {
            assert_eq!(extract_tenant_slug(path), None, "{path}");
        }
    }

    #[test]
    fn test_extract_tenant_slug_root() {
        assert_eq!(extract_tenant_slug("/"), None);
        assert_eq!(extract_tenant_slug(""), None);
    }

    #[tokio::test]
    async fn test_builtin_lookup_without_database() {
        let directory = TenantDirectory::new(None);

        let demo = directory.find_by_slug("demo-store").await.unwrap().unwrap();
        assert_eq!(demo.name, "Demo Store");

        let example = directory.find_by_slug("example").await.unwrap().unwrap();
        assert_eq!(example.name, "Example Store");

        assert!(directory.find_by_slug("nope").await.unwrap().is_none());
        assert!(directory.find_by_slug("Not A Slug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_builtin_tenants_have_no_domains() {
        let directory = TenantDirectory::new(None);
        assert!(directory.find_by_host("shop.example.com").await.unwrap().is_none());
        assert_eq!(directory.list().await.unwrap().len(), 2);
    }
}
