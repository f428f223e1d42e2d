//! Admin panel route handlers.
//!
//! Every handler takes [`RequireAdmin`]; signed-out visitors never reach
//! here (the auth gate redirects them) and signed-in non-admins are sent
//! home.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use tenantmart_core::Price;

use crate::db::{OrderRepository, OrderSummary};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::Layout;
use crate::routes::orders::OrderView;
use crate::routes::products::{ProductView, load_or_empty};
use crate::services::SessionUser;
use crate::state::AppState;

/// Orders shown on the admin order listing.
const RECENT_ORDER_LIMIT: i64 = 50;

/// Customers shown on the admin user listing.
const CUSTOMER_LIMIT: i64 = 100;

/// Headline numbers on the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub product_count: usize,
    pub store_count: usize,
    pub order_count: i64,
    pub customer_count: i64,
    pub revenue: String,
}

impl DashboardStats {
    fn new(product_count: usize, store_count: usize, orders: &OrderSummary) -> Self {
        Self {
            product_count,
            store_count,
            order_count: orders.order_count,
            customer_count: orders.customer_count,
            revenue: Price::usd(orders.revenue).display(),
        }
    }
}

/// Customer row on the user listing.
#[derive(Debug, Clone)]
pub struct CustomerView {
    pub user_id: String,
    pub order_count: i64,
    pub total_spent: String,
    pub last_order_on: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub layout: Layout,
    pub stats: DashboardStats,
    pub has_database: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub layout: Layout,
    pub products: Vec<ProductView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderView>,
    pub has_database: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct AdminUsersTemplate {
    pub layout: Layout,
    pub customers: Vec<CustomerView>,
    pub has_database: bool,
}

fn admin_layout(user: &SessionUser, state: &AppState) -> Layout {
    Layout::new(Some(user), state).in_admin()
}

/// Redirect `/admin` to the dashboard.
pub async fn index(RequireAdmin(_user): RequireAdmin) -> Redirect {
    Redirect::to("/admin/dashboard")
}

/// Store-wide totals.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = load_or_empty(state.catalog().all_products()).await;
    let stores = state.tenants().list().await?;
    let orders = match state.pool() {
        Some(pool) => OrderRepository::new(pool).summary().await?,
        None => OrderSummary::default(),
    };

    Ok(AdminDashboardTemplate {
        layout: admin_layout(&user, &state),
        stats: DashboardStats::new(products.len(), stores.len(), &orders),
        has_database: state.pool().is_some(),
    })
}

/// Every product across all stores.
#[instrument(skip_all)]
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> impl IntoResponse {
    let products = load_or_empty(state.catalog().all_products()).await;

    AdminProductsTemplate {
        layout: admin_layout(&user, &state),
        products: products
            .iter()
            .map(|p| ProductView::new(p, "/products"))
            .collect(),
    }
}

/// Most recent orders across all stores.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = match state.pool() {
        Some(pool) => OrderRepository::new(pool)
            .list_recent(RECENT_ORDER_LIMIT)
            .await?
            .iter()
            .map(OrderView::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(AdminOrdersTemplate {
        layout: admin_layout(&user, &state),
        orders,
        has_database: state.pool().is_some(),
    })
}

/// Customers who have placed orders, biggest spenders first.
#[instrument(skip_all)]
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Result<impl IntoResponse> {
    let customers = match state.pool() {
        Some(pool) => OrderRepository::new(pool)
            .list_customers(CUSTOMER_LIMIT)
            .await?
            .into_iter()
            .map(|c| CustomerView {
                user_id: c.user_id,
                order_count: c.order_count,
                total_spent: Price::usd(c.total_spent).display(),
                last_order_on: c.last_order_at.format("%B %-d, %Y").to_string(),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(AdminUsersTemplate {
        layout: admin_layout(&user, &state),
        customers,
        has_database: state.pool().is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_stats_without_orders() {
        let stats = DashboardStats::new(12, 2, &OrderSummary::default());
        assert_eq!(stats.product_count, 12);
        assert_eq!(stats.store_count, 2);
        assert_eq!(stats.order_count, 0);
        assert_eq!(stats.revenue, "$0.00");
    }
}
