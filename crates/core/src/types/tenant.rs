//! Tenant (store) domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Slug, TenantId};

/// A logical store scope.
///
/// Tenants are owned by the relational backend; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique tenant ID.
    pub id: TenantId,
    /// URL key (`/{slug}/...`).
    pub slug: Slug,
    /// Display name.
    pub name: String,
    /// Optional custom domain serving this tenant's storefront.
    pub domain: Option<String>,
    /// When the tenant was created, if known.
    pub created_at: Option<DateTime<Utc>>,
}

impl Tenant {
    /// Whether the given request host (possibly with a port) is this tenant's domain.
    #[must_use]
    pub fn serves_host(&self, host: &str) -> bool {
        let host = host.split(':').next().unwrap_or(host);
        self.domain
            .as_deref()
            .is_some_and(|domain| domain.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tenant(domain: Option<&str>) -> Tenant {
        Tenant {
            id: TenantId::new(uuid::Uuid::nil()),
            slug: Slug::parse("demo-store").unwrap(),
            name: "Demo Store".to_string(),
            domain: domain.map(String::from),
            created_at: None,
        }
    }

    #[test]
    fn test_serves_host_ignores_port_and_case() {
        let t = tenant(Some("shop.example.com"));
        assert!(t.serves_host("shop.example.com"));
        assert!(t.serves_host("SHOP.example.com:8443"));
        assert!(!t.serves_host("other.example.com"));
    }

    #[test]
    fn test_serves_host_without_domain() {
        assert!(!tenant(None).serves_host("shop.example.com"));
    }
}
