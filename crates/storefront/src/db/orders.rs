//! Order repository.
//!
//! Orders are written by the checkout backend; the storefront only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tenantmart_core::{Order, OrderId, OrderStatus, TenantId};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, tenant_id, user_id, total, status, created_at, updated_at";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    tenant_id: Uuid,
    user_id: String,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let status = OrderStatus::from_db(&row.status).unwrap_or_else(|| {
            tracing::warn!(
                order_id = %row.id,
                status = %row.status,
                "Unknown order status, showing as pending"
            );
            OrderStatus::Pending
        });

        Self {
            id: OrderId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            user_id: row.user_id,
            total: row.total,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Store-wide order totals for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct OrderSummary {
    pub order_count: i64,
    pub customer_count: i64,
    pub revenue: Decimal,
}

/// Per-customer order totals for the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CustomerSummary {
    pub user_id: String,
    pub order_count: i64,
    pub total_spent: Decimal,
    pub last_order_at: DateTime<Utc>,
}

/// Repository for the `orders` table.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// One order, only if it belongs to the given customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Most recent orders across all tenants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Order count, distinct customers and revenue across all orders.
    ///
    /// Cancelled orders count toward the order total but not revenue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self) -> Result<OrderSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, OrderSummary>(
            r"
            SELECT COUNT(*) AS order_count,
                   COUNT(DISTINCT user_id) AS customer_count,
                   COALESCE(SUM(total) FILTER (WHERE status NOT IN ('cancelled', 'canceled')), 0) AS revenue
            FROM orders
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Customers who have ordered, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_customers(&self, limit: i64) -> Result<Vec<CustomerSummary>, RepositoryError> {
        let customers = sqlx::query_as::<_, CustomerSummary>(
            r"
            SELECT user_id,
                   COUNT(*) AS order_count,
                   COALESCE(SUM(total), 0) AS total_spent,
                   MAX(created_at) AS last_order_at
            FROM orders
            GROUP BY user_id
            ORDER BY last_order_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(status: &str) -> OrderRow {
        OrderRow {
            id: Uuid::nil(),
            tenant_id: Uuid::nil(),
            user_id: "user_1".to_string(),
            total: Decimal::new(4200, 2),
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let order = Order::from(row("shipped"));
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total_price().display(), "$42.00");
    }

    #[test]
    fn test_row_with_unknown_status_reads_as_pending() {
        let order = Order::from(row("teleported"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, "user_1");
    }
}
