//! Product route handlers.
//!
//! The view types here are shared with the tenant store pages, which render
//! the same catalog over a tenant's products.

use std::str::FromStr;
use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use tenantmart_core::Product;
use tenantmart_core::catalog::{self, CatalogQuery, PageLink, SortKey};

use crate::content::CatalogSource;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalUser;
use crate::routes::Layout;
use crate::state::AppState;

/// Most related products shown under a product.
const RELATED_LIMIT: usize = 4;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub price: String,
    pub category: Option<String>,
    pub shop_name: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub in_stock: bool,
    pub stock_label: String,
    pub href: String,
}

impl ProductView {
    /// Build the view, linking under `base_path` (e.g. `/products`).
    #[must_use]
    pub fn new(product: &Product, base_path: &str) -> Self {
        let key = product_key(product);
        let stock_label = match (product.in_stock, product.stock_quantity) {
            (false, _) | (true, Some(0)) => "Out of stock".to_string(),
            (true, Some(n)) if n <= 5 => format!("Only {n} left"),
            (true, _) => "In stock".to_string(),
        };

        Self {
            id: product.id.clone(),
            slug: key.to_string(),
            name: product.name.clone(),
            price: product.unit_price().display(),
            category: product.category.clone().filter(|c| !c.is_empty()),
            shop_name: product.shop_name.clone(),
            image_url: product.image_url.clone().filter(|u| !u.is_empty()),
            description: product.description.clone().filter(|d| !d.is_empty()),
            in_stock: product.in_stock && product.stock_quantity != Some(0),
            stock_label,
            href: format!("{base_path}/{key}"),
        }
    }
}

/// URL key for a product: its slug, or its document ID when it has none.
fn product_key(product: &Product) -> &str {
    if product.slug.is_empty() {
        &product.id
    } else {
        &product.slug
    }
}

/// Catalog query parameters as sent by the filter form.
///
/// Everything is optional text so that a malformed value falls back to its
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub filter: Option<String>,
}

impl CatalogParams {
    /// Resolve into a catalog query.
    #[must_use]
    pub fn to_query(&self) -> CatalogQuery {
        let sort = if self.filter.as_deref() == Some("new") {
            SortKey::Newest
        } else {
            self.sort.as_deref().map(SortKey::parse).unwrap_or_default()
        };

        CatalogQuery {
            category: non_blank(self.category.as_deref())
                .filter(|c| !c.eq_ignore_ascii_case("all"))
                .map(String::from),
            min_price: parse_price(self.min_price.as_deref()),
            max_price: parse_price(self.max_price.as_deref()),
            sort,
            page: self
                .page
                .as_deref()
                .and_then(|p| p.trim().parse::<u32>().ok())
                .unwrap_or(1),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: Option<&str>) -> Option<Decimal> {
    non_blank(value)
        .and_then(|v| Decimal::from_str(v).ok())
        .filter(|d| !d.is_sign_negative())
}

/// A selectable option in a filter dropdown.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One pager entry; `href` is `None` for ellipses and the current page.
#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub label: String,
    pub href: Option<String>,
    pub current: bool,
}

/// Current filter values, echoed back into the form.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub category: String,
    pub min_price: String,
    pub max_price: String,
    pub sort: String,
}

/// Everything a catalog page template needs.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub base_path: String,
    pub products: Vec<ProductView>,
    pub featured: Vec<ProductView>,
    pub categories: Vec<OptionView>,
    pub sorts: Vec<OptionView>,
    pub filters: FilterState,
    pub pages: Vec<PageLinkView>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub price_range: Option<String>,
}

impl CatalogPage {
    /// Derive one catalog page from the full product list.
    ///
    /// The featured strip only appears on the unfiltered first page.
    #[must_use]
    pub fn build(products: &[Product], params: &CatalogParams, base_path: &str) -> Self {
        let query = params.to_query();
        let view = catalog::derive_view(products, &query);

        let filters = FilterState {
            category: query.category.clone().unwrap_or_default(),
            min_price: query.min_price.map(|d| d.to_string()).unwrap_or_default(),
            max_price: query.max_price.map(|d| d.to_string()).unwrap_or_default(),
            sort: query.sort.as_str().to_string(),
        };

        let categories = catalog::categories(products)
            .into_iter()
            .map(|c| OptionView {
                selected: query.category.as_deref() == Some(c.as_str()),
                value: c.clone(),
                label: c,
            })
            .collect();

        let sorts = SortKey::ALL
            .into_iter()
            .map(|key| OptionView {
                value: key.as_str().to_string(),
                label: key.label().to_string(),
                selected: key == query.sort,
            })
            .collect();

        let pages = catalog::page_links(view.page, view.total_pages)
            .into_iter()
            .map(|link| match link {
                PageLink::Page(n) => PageLinkView {
                    label: n.to_string(),
                    href: (n != view.page).then(|| page_href(base_path, &filters, n)),
                    current: n == view.page,
                },
                PageLink::Ellipsis => PageLinkView {
                    label: "...".to_string(),
                    href: None,
                    current: false,
                },
            })
            .collect();

        let unfiltered = query.category.is_none()
            && query.min_price.is_none()
            && query.max_price.is_none()
            && view.page == 1;
        let featured = if unfiltered {
            catalog::featured(products)
                .iter()
                .map(|p| ProductView::new(p, base_path))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            base_path: base_path.to_string(),
            products: view
                .items
                .iter()
                .map(|p| ProductView::new(p, base_path))
                .collect(),
            featured,
            categories,
            sorts,
            previous_href: view
                .has_previous()
                .then(|| page_href(base_path, &filters, view.page - 1)),
            next_href: view
                .has_next()
                .then(|| page_href(base_path, &filters, view.page + 1)),
            pages,
            page: view.page,
            total_pages: view.total_pages,
            total_items: view.total_items,
            price_range: catalog::price_bounds(products).map(|(min, max)| {
                format!(
                    "{} to {}",
                    tenantmart_core::Price::usd(min).display(),
                    tenantmart_core::Price::usd(max).display()
                )
            }),
            filters,
        }
    }
}

/// Link to `page` keeping the active filters.
fn page_href(base_path: &str, filters: &FilterState, page: u32) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in [
        ("category", filters.category.as_str()),
        ("min_price", filters.min_price.as_str()),
        ("max_price", filters.max_price.as_str()),
    ] {
        if !value.is_empty() {
            query.append_pair(key, value);
        }
    }
    if filters.sort != SortKey::default().as_str() {
        query.append_pair("sort", &filters.sort);
    }
    query.append_pair("page", &page.to_string());
    format!("{base_path}?{}", query.finish())
}

/// Load products, logging failures and treating them as an empty catalog.
pub async fn load_or_empty<F>(load: F) -> Arc<Vec<Product>>
where
    F: Future<Output = std::result::Result<Arc<Vec<Product>>, crate::content::ContentError>>,
{
    match load.await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            Arc::new(Vec::new())
        }
    }
}

/// Look a product up by slug, then by document ID.
///
/// Fetch failures are logged and reported as missing.
pub async fn find_product(catalog: &CatalogSource, key: &str) -> Option<Arc<Product>> {
    let found = match catalog.product_by_slug(key).await {
        Ok(None) => catalog.product_by_id(key).await,
        other => other,
    };

    match found {
        Ok(product) => product,
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Failed to load product");
            None
        }
    }
}

/// Products sharing a category with `product`, excluding it.
#[must_use]
pub fn related(products: &[Product], product: &Product, base_path: &str) -> Vec<ProductView> {
    let Some(category) = product.category.as_deref() else {
        return Vec::new();
    };
    products
        .iter()
        .filter(|p| p.id != product.id && p.category.as_deref() == Some(category))
        .take(RELATED_LIMIT)
        .map(|p| ProductView::new(p, base_path))
        .collect()
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub title: String,
    pub catalog: CatalogPage,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub back_href: String,
    pub related_products: Vec<ProductView>,
}

/// Display product listing page.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let products = load_or_empty(state.catalog().all_products()).await;

    ProductsIndexTemplate {
        layout: Layout::new(user.as_ref(), &state),
        title: "All Products".to_string(),
        catalog: CatalogPage::build(&products, &params, "/products"),
    }
}

/// Display product detail page.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = find_product(state.catalog(), &slug)
        .await
        .ok_or_else(|| AppError::NotFound("that product".to_string()))?;

    let products = load_or_empty(state.catalog().all_products()).await;

    Ok(ProductShowTemplate {
        layout: Layout::new(user.as_ref(), &state),
        product: ProductView::new(&product, "/products"),
        back_href: "/products".to_string(),
        related_products: related(&products, &product, "/products"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(n: u32, category: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": format!("p{n}"),
            "_createdAt": format!("2025-01-{:02}T00:00:00Z", n.min(28)),
            "name": format!("Product {n}"),
            "slug": format!("product-{n}"),
            "price": n * 10,
            "category": category,
        }))
        .unwrap()
    }

    fn products(n: u32) -> Vec<Product> {
        (1..=n)
            .map(|i| product(i, if i % 3 == 0 { "Home" } else { "Apparel" }))
            .collect()
    }

    #[test]
    fn test_params_to_query_lenient() {
        let params = CatalogParams {
            category: Some("all".to_string()),
            min_price: Some("abc".to_string()),
            max_price: Some("25.50".to_string()),
            sort: Some("price-high".to_string()),
            page: Some("-2".to_string()),
            filter: None,
        };
        let query = params.to_query();
        assert_eq!(query.category, None);
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, Some(Decimal::new(2550, 2)));
        assert_eq!(query.sort, SortKey::PriceHigh);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_filter_new_forces_newest() {
        let params = CatalogParams {
            sort: Some("name".to_string()),
            filter: Some("new".to_string()),
            ..CatalogParams::default()
        };
        assert_eq!(params.to_query().sort, SortKey::Newest);
    }

    #[test]
    fn test_catalog_page_pagination_links_keep_filters() {
        let products = products(30);
        let params = CatalogParams {
            category: Some("Apparel".to_string()),
            page: Some("2".to_string()),
            ..CatalogParams::default()
        };
        let page = CatalogPage::build(&products, &params, "/products");

        assert_eq!(page.total_items, 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.products.len(), 9);
        assert_eq!(
            page.previous_href.as_deref(),
            Some("/products?category=Apparel&page=1")
        );
        assert_eq!(
            page.next_href.as_deref(),
            Some("/products?category=Apparel&page=3")
        );
        assert!(page.featured.is_empty());
        assert!(page.pages.iter().any(|link| link.current && link.label == "2"));
    }

    #[test]
    fn test_catalog_page_featured_on_unfiltered_first_page() {
        let products = products(10);
        let page = CatalogPage::build(&products, &CatalogParams::default(), "/demo-store/products");

        assert_eq!(page.featured.len(), 4);
        assert_eq!(page.featured[0].id, products[1].id);
        assert!(page.products[0].href.starts_with("/demo-store/products/"));
        assert_eq!(page.price_range.as_deref(), Some("$10.00 to $100.00"));
    }

    #[test]
    fn test_catalog_page_empty() {
        let page = CatalogPage::build(&[], &CatalogParams::default(), "/products");
        assert!(page.products.is_empty());
        assert!(page.pages.is_empty());
        assert!(page.price_range.is_none());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_product_view_stock_labels() {
        let mut p = product(1, "Home");
        assert_eq!(ProductView::new(&p, "/products").stock_label, "In stock");

        p.stock_quantity = Some(3);
        assert_eq!(ProductView::new(&p, "/products").stock_label, "Only 3 left");

        p.stock_quantity = Some(0);
        let view = ProductView::new(&p, "/products");
        assert!(!view.in_stock);
        assert_eq!(view.stock_label, "Out of stock");
    }

    #[test]
    fn test_product_view_falls_back_to_id() {
        let mut p = product(1, "Home");
        p.slug = String::new();
        assert_eq!(ProductView::new(&p, "/products").href, "/products/p1");
    }

    #[test]
    fn test_related_same_category() {
        let products = products(12);
        let home = &products[2];
        let related = related(&products, home, "/products");
        assert!(!related.is_empty());
        assert!(related.len() <= RELATED_LIMIT);
        assert!(related.iter().all(|p| p.category.as_deref() == Some("Home") && p.id != home.id));
    }
}
