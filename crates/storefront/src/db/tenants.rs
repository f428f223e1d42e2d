//! Tenant repository.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tenantmart_core::{Slug, Tenant, TenantId};

use super::RepositoryError;

const TENANT_COLUMNS: &str = "id, slug, name, domain, created_at";

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    slug: String,
    name: String,
    domain: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = RepositoryError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tenant slug {:?}: {e}", row.slug))
        })?;

        Ok(Self {
            id: TenantId::new(row.id),
            slug,
            name: row.name,
            domain: row.domain,
            created_at: Some(row.created_at),
        })
    }
}

/// Repository for the `tenants` table.
pub struct TenantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TenantRepository<'a> {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look a tenant up by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored slug is invalid.
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Tenant>, RepositoryError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE slug = $1"
        ))
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Tenant::try_from).transpose()
    }

    /// Look a tenant up by its custom domain (case-insensitive, no port).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_domain(&self, domain: &str) -> Result<Option<Tenant>, RepositoryError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE lower(domain) = lower($1)"
        ))
        .bind(domain)
        .fetch_optional(self.pool)
        .await?;

        row.map(Tenant::try_from).transpose()
    }

    /// All tenants ordered by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants ORDER BY slug"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Tenant::try_from).collect()
    }

    /// Insert a tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or domain is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        slug: &Slug,
        name: &str,
        domain: Option<&str>,
    ) -> Result<Tenant, RepositoryError> {
        let row: TenantRow = sqlx::query_as(&format!(
            "INSERT INTO tenants (slug, name, domain) VALUES ($1, $2, $3) RETURNING {TENANT_COLUMNS}"
        ))
        .bind(slug.as_str())
        .bind(name)
        .bind(domain)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!("tenant {slug} already exists"));
            }
            RepositoryError::Database(e)
        })?;

        Tenant::try_from(row)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(slug: &str) -> TenantRow {
        TenantRow {
            id: Uuid::nil(),
            slug: slug.to_string(),
            name: "Demo Store".to_string(),
            domain: Some("demo.example.com".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let tenant = Tenant::try_from(row("demo-store")).unwrap();
        assert_eq!(tenant.slug.as_str(), "demo-store");
        assert!(tenant.serves_host("demo.example.com"));
        assert!(tenant.created_at.is_some());
    }

    #[test]
    fn test_row_with_bad_slug_is_corruption() {
        let result = Tenant::try_from(row("Not A Slug"));
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }
}
