//! Tenant store pages.
//!
//! Every handler here resolves the tenant from the first path segment;
//! unknown tenants render the not-found page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use tenantmart_core::Tenant;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CurrentTenant, RequireUser};
use crate::routes::Layout;
use crate::routes::products::{
    CatalogPage, CatalogParams, ProductShowTemplate, ProductView, ProductsIndexTemplate,
    find_product, load_or_empty, related,
};
use crate::state::AppState;

/// Newest products shown on a store's landing page.
const LANDING_PRODUCTS: usize = 6;

/// Store landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/show.html")]
pub struct StoreTemplate {
    pub layout: Layout,
    pub store_name: String,
    pub products_href: String,
    pub new_arrivals_href: String,
    pub products: Vec<ProductView>,
}

fn products_path(tenant: &Tenant) -> String {
    format!("/{}/products", tenant.slug)
}

/// Render a store's landing page for the given visitor chrome.
pub async fn render_landing(state: &AppState, layout: Layout, tenant: &Tenant) -> StoreTemplate {
    let base_path = products_path(tenant);
    let products = load_or_empty(state.catalog().tenant_products(tenant.slug.as_str())).await;

    StoreTemplate {
        layout: layout.in_store(tenant),
        store_name: tenant.name.clone(),
        new_arrivals_href: format!("{base_path}?filter=new"),
        products: products
            .iter()
            .take(LANDING_PRODUCTS)
            .map(|p| ProductView::new(p, &base_path))
            .collect(),
        products_href: base_path,
    }
}

/// Display a store's landing page.
#[instrument(skip_all, fields(store = %tenant.slug))]
pub async fn show(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    RequireUser(user): RequireUser,
) -> impl IntoResponse {
    render_landing(&state, Layout::new(Some(&user), &state), &tenant).await
}

/// Display a store's catalog.
#[instrument(skip_all, fields(store = %tenant.slug))]
pub async fn products(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    RequireUser(user): RequireUser,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let products = load_or_empty(state.catalog().tenant_products(tenant.slug.as_str())).await;

    ProductsIndexTemplate {
        layout: Layout::new(Some(&user), &state).in_store(&tenant),
        title: format!("{} Products", tenant.name),
        catalog: CatalogPage::build(&products, &params, &products_path(&tenant)),
    }
}

/// Display a store's product detail page.
///
/// Products belonging to another tenant are not found here.
#[instrument(skip_all, fields(store = %tenant.slug, product = %slug))]
pub async fn product(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    RequireUser(user): RequireUser,
    Path((_store_slug, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let product = find_product(state.catalog(), &slug)
        .await
        .filter(|p| p.belongs_to(tenant.slug.as_str()))
        .ok_or_else(|| AppError::NotFound("that product".to_string()))?;

    let base_path = products_path(&tenant);
    let products = load_or_empty(state.catalog().tenant_products(tenant.slug.as_str())).await;

    Ok(ProductShowTemplate {
        layout: Layout::new(Some(&user), &state).in_store(&tenant),
        product: ProductView::new(&product, &base_path),
        related_products: related(&products, &product, &base_path),
        back_href: base_path,
    })
}
