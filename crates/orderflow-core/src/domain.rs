//! Persisted entities and their input forms.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Database identity.
    pub id: i64,
    /// Display name, non-empty and at most 128 characters.
    pub name: String,
    /// Unit price, strictly positive.
    pub price: Decimal,
}

/// Input for creating or updating an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
}

/// Order lifecycle status.
///
/// `Created` is assigned at creation. Payment events move an order to
/// `ToPay`, `Paid`, or `Failed`. Editing an existing order's lines always
/// moves it to `Changed`, whatever the prior status was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Just created, no payment observed yet.
    Created,
    /// A payment record exists and awaits resolution.
    ToPay,
    /// The payment settled successfully.
    Paid,
    /// The payment failed.
    Failed,
    /// The order's line set was edited after creation.
    Changed,
}

impl OrderStatus {
    /// The status spelling stored in the database and exposed over the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::ToPay => "TO_PAY",
            Self::Paid => "PAID",
            Self::Failed => "FAILED",
            Self::Changed => "CHANGED",
        }
    }

    /// Parses the stored spelling back into a status.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREATED" => Some(Self::Created),
            "TO_PAY" => Some(Self::ToPay),
            "PAID" => Some(Self::Paid),
            "FAILED" => Some(Self::Failed),
            "CHANGED" => Some(Self::Changed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order and the lines it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Database identity.
    pub id: i64,
    /// Owning user, resolved against the user service at read time.
    pub user_id: i64,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Date the order was placed.
    pub creation_date: NaiveDate,
    /// Opaque payment correlation id, set once a payment is observed.
    pub payment_ref: Option<Uuid>,
    /// Lines owned by this order, in insertion order.
    pub lines: Vec<OrderLine>,
}

/// One (item, quantity) pairing attached to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Database identity.
    pub id: i64,
    /// Owning order.
    pub order_id: i64,
    /// Referenced catalog item.
    pub item_id: i64,
    /// Units ordered, at least 1.
    pub quantity: i32,
}

/// Input for creating or replacing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// Owning user.
    pub user_id: i64,
    /// Date the order was placed.
    pub creation_date: NaiveDate,
    /// Lines to attach; each referenced item must exist.
    pub lines: Vec<NewOrderLine>,
}

/// Input for attaching one line to an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewOrderLine {
    /// Referenced catalog item.
    pub item_id: i64,
    /// Units ordered.
    pub quantity: i32,
}
