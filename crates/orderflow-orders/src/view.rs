//! Assembled response views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use orderflow_core::domain::{Item, OrderStatus};
use orderflow_core::user::UserInfo;

/// An order as returned by the API, with its lines expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    /// Order identity.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Date the order was placed.
    pub creation_date: NaiveDate,
    /// Lines with their item details resolved.
    pub lines: Vec<OrderLineView>,
}

/// One order line with its referenced item resolved.
///
/// `item` is `None` when the catalog item was deleted after the line was
/// attached; such lines contribute zero to the order total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineView {
    /// Line identity.
    pub id: i64,
    /// The referenced catalog item, if it still exists.
    pub item: Option<Item>,
    /// Units ordered.
    pub quantity: i32,
}

/// An order view paired with its owner's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithUser {
    /// The assembled order.
    pub order: OrderView,
    /// The owner's profile from the user service.
    pub user: UserInfo,
}
