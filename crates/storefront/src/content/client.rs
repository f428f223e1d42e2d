//! Content platform HTTP client.
//!
//! Issues read-only GROQ queries over the HTTP query API with `reqwest`.
//! Responses are cached using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use tenantmart_core::Product;

use super::cache::{CacheKey, CacheValue};
use super::{ContentError, decode_products, queries};
use crate::config::SanityConfig;

/// Envelope around every query result.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Client for the content platform's query API.
///
/// Cloning is cheap; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ContentClient {
    /// Create a new content client.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotConfigured` if the project or dataset is blank.
    pub fn new(config: &SanityConfig) -> Result<Self, ContentError> {
        if config.project_id.trim().is_empty() || config.dataset.trim().is_empty() {
            return Err(ContentError::NotConfigured);
        }

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ContentClientInner {
                client: reqwest::Client::new(),
                endpoint: query_endpoint(config),
                api_token: config.api_token.clone(),
                cache,
            }),
        })
    }

    /// Run a GROQ query with JSON-encoded `$name` parameters.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ContentError> {
        let mut request = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&encode_params(query, params)?);

        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&body);
            tracing::error!(
                status = %status,
                message = %message,
                "Content API returned non-success status"
            );
            return Err(ContentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<QueryResponse<T>>(&body) {
            Ok(parsed) => Ok(parsed.result),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse content API response"
                );
                Err(ContentError::Parse(e))
            }
        }
    }

    async fn cached_products(
        &self,
        key: CacheKey,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<Arc<Vec<Product>>, ContentError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let documents: Vec<serde_json::Value> = self.execute(query, params).await?;
        let products = Arc::new(decode_products(documents));
        self.inner
            .cache
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    async fn cached_product(
        &self,
        key: CacheKey,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Arc<Product>>, ContentError> {
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(Some(product));
        }

        let Some(product) = self.execute::<Option<Product>>(query, params).await? else {
            return Ok(None);
        };
        let product = Arc::new(product);
        self.inner
            .cache
            .insert(key, CacheValue::Product(Arc::clone(&product)))
            .await;

        Ok(Some(product))
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>, ContentError> {
        self.cached_products(CacheKey::AllProducts, queries::ALL_PRODUCTS, &[])
            .await
    }

    /// Products owned by the tenant with the given slug, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn tenant_products(&self, shop: &str) -> Result<Arc<Vec<Product>>, ContentError> {
        self.cached_products(
            CacheKey::TenantProducts(shop.to_string()),
            queries::TENANT_PRODUCTS,
            &[("shop", shop)],
        )
        .await
    }

    /// The product with the given slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Arc<Product>>, ContentError> {
        self.cached_product(
            CacheKey::ProductBySlug(slug.to_string()),
            queries::PRODUCT_BY_SLUG,
            &[("slug", slug)],
        )
        .await
    }

    /// The product with the given document ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn product_by_id(&self, id: &str) -> Result<Option<Arc<Product>>, ContentError> {
        self.cached_product(
            CacheKey::ProductById(id.to_string()),
            queries::PRODUCT_BY_ID,
            &[("id", id)],
        )
        .await
    }
}

/// `https://{project}.api.sanity.io/v{version}/data/query/{dataset}`
fn query_endpoint(config: &SanityConfig) -> String {
    format!(
        "https://{}.api.sanity.io/v{}/data/query/{}",
        config.project_id, config.api_version, config.dataset
    )
}

/// Build the query string: the GROQ text plus `$name` params as JSON strings.
fn encode_params(
    query: &str,
    params: &[(&str, &str)],
) -> Result<Vec<(String, String)>, ContentError> {
    let mut pairs = Vec::with_capacity(params.len() + 1);
    pairs.push(("query".to_string(), query.to_string()));
    for (name, value) in params {
        pairs.push((format!("${name}"), serde_json::to_string(value)?));
    }
    Ok(pairs)
}

/// Pull `error.description` out of an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/description")
                .or_else(|| value.pointer("/message"))
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(project_id: &str) -> SanityConfig {
        SanityConfig {
            project_id: project_id.to_string(),
            dataset: "production".to_string(),
            api_version: "2025-01-01".to_string(),
            api_token: None,
        }
    }

    #[test]
    fn test_query_endpoint() {
        assert_eq!(
            query_endpoint(&config("abc123")),
            "https://abc123.api.sanity.io/v2025-01-01/data/query/production"
        );
    }

    #[test]
    fn test_new_requires_project() {
        assert!(matches!(
            ContentClient::new(&config("  ")),
            Err(ContentError::NotConfigured)
        ));
        assert!(ContentClient::new(&config("abc123")).is_ok());
    }

    #[test]
    fn test_encode_params_json_quotes_values() {
        let pairs = encode_params("*[slug == $slug]", &[("slug", "linen \"shirt\"")]).unwrap();
        assert_eq!(pairs[0], ("query".to_string(), "*[slug == $slug]".to_string()));
        assert_eq!(
            pairs[1],
            ("$slug".to_string(), r#""linen \"shirt\"""#.to_string())
        );
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"description":"param $shop referenced, but not provided","type":"queryParseError"}}"#;
        assert_eq!(
            api_error_message(body),
            "param $shop referenced, but not provided"
        );
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_query_response_null_result() {
        let parsed: QueryResponse<Option<Product>> =
            serde_json::from_str(r#"{"query":"*[0]","result":null,"ms":3}"#).unwrap();
        assert!(parsed.result.is_none());
    }
}
