//! Business logic services for storefront.

pub mod auth;
pub mod tenants;

pub use auth::{AuthError, SessionUser, SessionVerifier};
pub use tenants::{TenantDirectory, extract_tenant_slug};
