//! Local order history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{Money, OrderId, OrderStatus, PaymentMethod, ProductId, ShippingDetails};

use crate::checkout::OrderSummary;

/// One purchased line as it was priced at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecordLine {
    pub item_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// An order the service accepted, kept for the orders page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_number: String,
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<OrderRecordLine>,
    /// Client-side estimate shown at checkout.
    pub summary: OrderSummary,
    /// Total the service reported for the order.
    pub charged_total: Money,
    pub payment_method: PaymentMethod,
    pub ship_to: ShippingDetails,
}

/// Tabs on the orders page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderTab {
    #[default]
    All,
    /// Pending through shipped.
    Active,
    Delivered,
    Cancelled,
}

impl OrderTab {
    #[must_use]
    pub const fn matches(self, status: OrderStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status.is_active(),
            Self::Delivered => matches!(status, OrderStatus::Delivered),
            Self::Cancelled => matches!(status, OrderStatus::Cancelled),
        }
    }
}

impl fmt::Display for OrderTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        })
    }
}

impl FromStr for OrderTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" | "pending" => Ok(Self::Active),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order tab: {other}")),
        }
    }
}

/// Placed orders, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<OrderRecord>", into = "Vec<OrderRecord>")]
pub struct OrderHistory {
    orders: Vec<OrderRecord>,
}

impl From<Vec<OrderRecord>> for OrderHistory {
    fn from(mut orders: Vec<OrderRecord>) -> Self {
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        Self { orders }
    }
}

impl From<OrderHistory> for Vec<OrderRecord> {
    fn from(history: OrderHistory) -> Self {
        history.orders
    }
}

impl OrderHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly placed order at the top of the list.
    pub fn append(&mut self, order: OrderRecord) {
        self.orders.insert(0, order);
    }

    #[must_use]
    pub fn all(&self) -> &[OrderRecord] {
        &self.orders
    }

    #[must_use]
    pub fn filter(&self, tab: OrderTab) -> Vec<&OrderRecord> {
        self.orders.iter().filter(|o| tab.matches(o.status)).collect()
    }

    #[must_use]
    pub fn get(&self, order_number: &str) -> Option<&OrderRecord> {
        self.orders.iter().find(|o| o.order_number == order_number)
    }

    /// Apply the status the service now reports for an order.
    ///
    /// Returns whether the stored status changed; unknown order numbers are
    /// ignored.
    pub fn update_status(&mut self, order_number: &str, status: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|o| o.order_number == order_number) {
            Some(order) if order.status != status => {
                order.status = status;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(number: &str, status: OrderStatus, day: u32) -> OrderRecord {
        OrderRecord {
            order_number: number.to_string(),
            id: None,
            status,
            placed_at: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            items: Vec::new(),
            summary: OrderSummary::default(),
            charged_total: Money::zero(),
            payment_method: PaymentMethod::Card,
            ship_to: ShippingDetails::default(),
        }
    }

    #[test]
    fn test_append_puts_newest_first() {
        let mut history = OrderHistory::new();
        history.append(record("ORD-1", OrderStatus::Pending, 1));
        history.append(record("ORD-2", OrderStatus::Pending, 2));
        assert_eq!(history.all()[0].order_number, "ORD-2");
    }

    #[test]
    fn test_loading_sorts_newest_first() {
        let history = OrderHistory::from(vec![
            record("ORD-OLD", OrderStatus::Delivered, 1),
            record("ORD-NEW", OrderStatus::Pending, 9),
        ]);
        assert_eq!(history.all()[0].order_number, "ORD-NEW");
    }

    #[test]
    fn test_tabs() {
        let history = OrderHistory::from(vec![
            record("A", OrderStatus::Pending, 1),
            record("B", OrderStatus::Shipped, 2),
            record("C", OrderStatus::Delivered, 3),
            record("D", OrderStatus::Cancelled, 4),
        ]);
        assert_eq!(history.filter(OrderTab::All).len(), 4);
        assert_eq!(history.filter(OrderTab::Active).len(), 2);
        assert_eq!(history.filter(OrderTab::Delivered)[0].order_number, "C");
        assert_eq!(history.filter(OrderTab::Cancelled)[0].order_number, "D");
    }

    #[test]
    fn test_update_status_moves_order_between_tabs() {
        let mut history = OrderHistory::from(vec![record("ORD-1", OrderStatus::Shipped, 2)]);
        assert!(history.update_status("ORD-1", OrderStatus::Delivered));
        assert!(!history.update_status("ORD-1", OrderStatus::Delivered));
        assert!(!history.update_status("ORD-404", OrderStatus::Cancelled));

        assert!(history.filter(OrderTab::Active).is_empty());
        assert_eq!(history.filter(OrderTab::Delivered).len(), 1);
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("Pending".parse::<OrderTab>(), Ok(OrderTab::Active));
        assert_eq!("canceled".parse::<OrderTab>(), Ok(OrderTab::Cancelled));
        assert!("returned".parse::<OrderTab>().is_err());
    }

    #[test]
    fn test_lowercase_status_from_older_history() {
        let mut json = serde_json::to_value(record("ORD-9", OrderStatus::Pending, 5)).unwrap();
        json["status"] = serde_json::json!("delivered");
        let parsed: OrderRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status, OrderStatus::Delivered);
    }
}
