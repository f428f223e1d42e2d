//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use tenantmart_core::{Order, OrderId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireUser;
use crate::routes::Layout;
use crate::state::AppState;

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub reference: String,
    pub href: String,
    pub total: String,
    pub status: String,
    pub status_class: &'static str,
    pub placed_on: String,
    pub updated_on: String,
    pub customer: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            reference: order.reference(),
            href: format!("/orders/{}", order.id),
            total: order.total_price().display(),
            status: order.status.label().to_string(),
            status_class: order.status.as_str(),
            placed_on: order.created_at.format("%B %-d, %Y").to_string(),
            updated_on: order.updated_at.format("%B %-d, %Y").to_string(),
            customer: order.user_id.clone(),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderView>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderTemplate {
    pub layout: Layout,
    pub order: OrderView,
}

/// Display the signed-in user's orders.
///
/// Without a database there are no orders to show.
#[instrument(skip_all, fields(user_id = %user.user_id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse> {
    let orders = match state.pool() {
        Some(pool) => OrderRepository::new(pool)
            .list_for_user(&user.user_id)
            .await?
            .iter()
            .map(OrderView::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(OrdersTemplate {
        layout: Layout::new(Some(&user), &state),
        orders,
    })
}

/// Display one of the signed-in user's orders.
///
/// Malformed IDs and other customers' orders are not found.
#[instrument(skip_all, fields(user_id = %user.user_id, order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound("that order".to_string());

    let id = OrderId::parse(&id).map_err(|_| not_found())?;
    let pool = state.pool().ok_or_else(not_found)?;
    let order = OrderRepository::new(pool)
        .get_for_user(id, &user.user_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(OrderTemplate {
        layout: Layout::new(Some(&user), &state),
        order: OrderView::from(&order),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use tenantmart_core::{OrderStatus, TenantId};

    use super::*;

    #[test]
    fn test_order_view() {
        let order = Order {
            id: OrderId::parse("6f1c3a0e-2b7d-4e59-9a51-1d2f3c4b5a69").unwrap(),
            tenant_id: TenantId::new(uuid::Uuid::nil()),
            user_id: "user_1".to_string(),
            total: Decimal::new(9_950, 2),
            status: OrderStatus::Shipped,
            created_at: Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap(),
        };

        let view = OrderView::from(&order);
        assert_eq!(view.reference, "6F1C3A0E");
        assert_eq!(view.href, "/orders/6f1c3a0e-2b7d-4e59-9a51-1d2f3c4b5a69");
        assert_eq!(view.total, "$99.50");
        assert_eq!(view.status, "Shipped");
        assert_eq!(view.placed_on, "March 7, 2025");
    }
}
