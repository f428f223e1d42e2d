//! Cache types for content platform responses.

use std::sync::Arc;

use tenantmart_core::Product;

/// Cache key for product queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    AllProducts,
    TenantProducts(String),
    ProductBySlug(String),
    ProductById(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
}
