//! Product catalog source.
//!
//! # Architecture
//!
//! - The content platform is the source of truth for products; nothing is synced
//! - In-memory caching via `moka` for API responses (5 minute TTL)
//! - A JSON fixture can stand in for the platform in development and tests
//!
//! # Example
//!
//! ```rust,ignore
//! use tenantmart_storefront::content::CatalogSource;
//!
//! let catalog = CatalogSource::from_config(&config.content)?;
//! let products = catalog.tenant_products("demo-store").await?;
//! ```

mod cache;
mod client;
pub mod queries;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use tenantmart_core::Product;

use crate::config::ContentConfig;

pub use client::ContentClient;

/// Errors that can occur when loading catalog data.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The query API rejected the request.
    #[error("content API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No usable catalog source is configured.
    #[error("content source not configured")]
    NotConfigured,

    /// Fixture file could not be read.
    #[error("failed to read catalog fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where product data is read from.
#[derive(Clone)]
pub enum CatalogSource {
    /// Live content platform.
    Remote(ContentClient),
    /// Products loaded once from a JSON file, newest first.
    Fixture(Arc<Vec<Product>>),
}

impl CatalogSource {
    /// Build the source named by configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform settings are blank or the fixture
    /// cannot be read or parsed.
    pub fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        match config {
            ContentConfig::Sanity(sanity) => Ok(Self::Remote(ContentClient::new(sanity)?)),
            ContentConfig::Fixture(path) => Self::from_fixture_file(path),
        }
    }

    /// Load products from a JSON array of documents.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Fixture` if the file cannot be read and
    /// `ContentError::Parse` if it is not a product array.
    pub fn from_fixture_file(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Fixture {
            path: path.to_path_buf(),
            source,
        })?;
        let documents: Vec<serde_json::Value> = serde_json::from_str(&json)?;
        let products = decode_products(documents);
        tracing::info!(count = products.len(), path = %path.display(), "Loaded catalog fixture");
        Ok(Self::from_products(products))
    }

    /// Wrap an in-memory product list, ordered like the platform orders it.
    #[must_use]
    pub fn from_products(mut products: Vec<Product>) -> Self {
        // Undated documents sort last
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self::Fixture(Arc::new(products))
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote query fails.
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>, ContentError> {
        match self {
            Self::Remote(client) => client.all_products().await,
            Self::Fixture(products) => Ok(Arc::clone(products)),
        }
    }

    /// Products owned by the tenant with the given slug, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote query fails.
    pub async fn tenant_products(&self, shop: &str) -> Result<Arc<Vec<Product>>, ContentError> {
        match self {
            Self::Remote(client) => client.tenant_products(shop).await,
            Self::Fixture(products) => Ok(Arc::new(
                products.iter().filter(|p| p.belongs_to(shop)).cloned().collect(),
            )),
        }
    }

    /// The product with the given slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote query fails.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Arc<Product>>, ContentError> {
        match self {
            Self::Remote(client) => client.product_by_slug(slug).await,
            Self::Fixture(products) => Ok(products
                .iter()
                .find(|p| p.slug == slug)
                .cloned()
                .map(Arc::new)),
        }
    }

    /// The product with the given document ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote query fails.
    pub async fn product_by_id(&self, id: &str) -> Result<Option<Arc<Product>>, ContentError> {
        match self {
            Self::Remote(client) => client.product_by_id(id).await,
            Self::Fixture(products) => {
                Ok(products.iter().find(|p| p.id == id).cloned().map(Arc::new))
            }
        }
    }
}

/// Decode product documents one by one, skipping any that do not parse.
///
/// The query API omits null fields, so a single incomplete document must
/// not empty the whole listing.
fn decode_products(documents: Vec<serde_json::Value>) -> Vec<Product> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document
                .get("_id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("<missing>")
                .to_string();
            match serde_json::from_value::<Product>(document) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(
                        document_id = %id,
                        error = %e,
                        "Skipping malformed product document"
                    );
                    None
                }
            }
        })
        .collect()
}
