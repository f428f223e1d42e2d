//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::content::{CatalogSource, ContentError};
use crate::middleware::RouteMatcher;
use crate::services::{AuthError, SessionVerifier, TenantDirectory};

/// Error assembling application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("session verifier: {0}")]
    Auth(#[from] AuthError),
    #[error("catalog source: {0}")]
    Content(#[from] ContentError),
    #[error("public route patterns: {0}")]
    Routes(#[from] regex::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    catalog: CatalogSource,
    tenants: TenantDirectory,
    verifier: SessionVerifier,
    public_routes: RouteMatcher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool, when a database is configured
    ///
    /// # Errors
    ///
    /// Returns an error if the session public key is invalid or the catalog
    /// source cannot be opened.
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Result<Self, StateError> {
        let catalog = CatalogSource::from_config(&config.content)?;
        Self::with_catalog(config, pool, catalog)
    }

    /// Create application state over an already-built catalog source.
    ///
    /// # Errors
    ///
    /// Returns an error if the session public key is invalid.
    pub fn with_catalog(
        config: StorefrontConfig,
        pool: Option<PgPool>,
        catalog: CatalogSource,
    ) -> Result<Self, StateError> {
        let verifier = SessionVerifier::new(&config.auth)?;
        let public_routes = RouteMatcher::public()?;
        let tenants = TenantDirectory::new(pool.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                tenants,
                verifier,
                public_routes,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the database connection pool, if a database is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get the product catalog source.
    #[must_use]
    pub fn catalog(&self) -> &CatalogSource {
        &self.inner.catalog
    }

    /// Get the tenant directory.
    #[must_use]
    pub fn tenants(&self) -> &TenantDirectory {
        &self.inner.tenants
    }

    /// Get the session token verifier.
    #[must_use]
    pub fn verifier(&self) -> &SessionVerifier {
        &self.inner.verifier
    }

    /// Get the public route matcher.
    #[must_use]
    pub fn public_routes(&self) -> &RouteMatcher {
        &self.inner.public_routes
    }
}
