//! Current tenant extractor.

use axum::{extract::FromRequestParts, http::request::Parts};

use tenantmart_core::Tenant;

use crate::error::AppError;
use crate::services::extract_tenant_slug;
use crate::state::AppState;

/// The tenant named by the request path's first segment.
///
/// Unknown or malformed slugs reject with the not-found page.
pub struct CurrentTenant(pub Tenant);

impl FromRequestParts<AppState> for CurrentTenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let not_found = || AppError::NotFound("that store".to_string());
        let slug = extract_tenant_slug(parts.uri.path()).ok_or_else(not_found)?;

        state
            .tenants()
            .find_by_slug(slug)
            .await?
            .map(Self)
            .ok_or_else(not_found)
    }
}
