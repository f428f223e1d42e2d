//! Order domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, OrderStatus, Price, TenantId};

/// A customer order recorded in the relational backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Tenant the order was placed with.
    pub tenant_id: TenantId,
    /// Identity-provider user ID of the customer.
    pub user_id: String,
    /// Order total.
    pub total: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The order total in the default currency.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total)
    }

    /// Short reference shown to customers (first UUID group, uppercased).
    #[must_use]
    pub fn reference(&self) -> String {
        let id = self.id.to_string();
        id.split('-').next().unwrap_or(&id).to_uppercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_and_total() {
        let order = Order {
            id: OrderId::parse("6f1c3a0e-2b7d-4e59-9a51-1d2f3c4b5a69").unwrap(),
            tenant_id: TenantId::new(uuid::Uuid::nil()),
            user_id: "user_123".to_string(),
            total: Decimal::new(12_500, 2),
            status: OrderStatus::Processing,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(order.reference(), "6F1C3A0E");
        assert_eq!(order.total_price().display(), "$125.00");
    }
}
