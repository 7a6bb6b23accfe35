//! Persistence abstractions for items, orders, and order lines.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Item, NewItem, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus};
use crate::error::DomainError;

/// Repository for catalog items.
///
/// Lookups that match no row return `None`/`false`; callers translate that
/// into `DomainError::NotFound` at the boundary where the id came from.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persists a new item and returns it with its assigned id.
    async fn insert(&self, item: NewItem) -> Result<Item, DomainError>;

    /// Loads one item by id.
    async fn find(&self, id: i64) -> Result<Option<Item>, DomainError>;

    /// Loads the items whose ids appear in `ids`. Missing ids are simply
    /// absent from the result.
    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Item>, DomainError>;

    /// Loads all items.
    async fn list(&self) -> Result<Vec<Item>, DomainError>;

    /// Replaces an item's name and price in place.
    async fn update(&self, id: i64, item: NewItem) -> Result<Option<Item>, DomainError>;

    /// Deletes one item. Returns `false` if no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

/// Repository for orders and the lines they own.
///
/// Every mutation spans the order row and its lines atomically. Deletion
/// cascades to the lines explicitly; there is no ORM doing it behind the
/// scenes.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order with its lines in one transaction.
    async fn insert(&self, order: NewOrder, status: OrderStatus) -> Result<Order, DomainError>;

    /// Loads one order with its lines.
    async fn find(&self, id: i64) -> Result<Option<Order>, DomainError>;

    /// Loads all orders with their lines.
    async fn list(&self) -> Result<Vec<Order>, DomainError>;

    /// Loads orders whose stored status exactly matches one of the supplied
    /// values.
    async fn list_by_statuses(&self, statuses: &[String]) -> Result<Vec<Order>, DomainError>;

    /// Replaces the order's owner, date, and entire line set, and stores the
    /// given status. The old lines are discarded, not merged. Returns `None`
    /// if the order does not exist.
    async fn replace(
        &self,
        id: i64,
        order: NewOrder,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError>;

    /// Deletes an order and its lines. Returns `false` if no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Stores a payment outcome: the new status and the payment reference.
    /// Returns `false` if the order does not exist.
    async fn set_payment(
        &self,
        id: i64,
        status: OrderStatus,
        payment_ref: Uuid,
    ) -> Result<bool, DomainError>;
}

/// Repository for individual order lines, addressed outside their order.
#[async_trait]
pub trait OrderLineRepository: Send + Sync {
    /// Attaches a new line to an existing order.
    async fn insert(&self, order_id: i64, line: NewOrderLine) -> Result<OrderLine, DomainError>;

    /// Loads one line by id.
    async fn find(&self, id: i64) -> Result<Option<OrderLine>, DomainError>;

    /// Loads all lines owned by one order, in insertion order.
    async fn list_by_order(&self, order_id: i64) -> Result<Vec<OrderLine>, DomainError>;

    /// Replaces a line's item reference and quantity in place.
    async fn update(&self, id: i64, line: NewOrderLine) -> Result<Option<OrderLine>, DomainError>;

    /// Deletes one line. Returns `false` if no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}
