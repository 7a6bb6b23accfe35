//! Standalone order-line operations.
//!
//! Lines are normally written as part of an order create/update; this
//! service covers the direct line endpoints, which validate that the
//! owning order and the referenced item exist before touching the row.

use std::sync::Arc;

use orderflow_core::domain::{NewOrderLine, OrderLine};
use orderflow_core::error::DomainError;
use orderflow_core::repository::{ItemRepository, OrderLineRepository, OrderRepository};

/// CRUD over individual order lines.
pub struct LineService {
    lines: Arc<dyn OrderLineRepository>,
    orders: Arc<dyn OrderRepository>,
    items: Arc<dyn ItemRepository>,
}

impl LineService {
    /// Creates a service over the given collaborators.
    #[must_use]
    pub fn new(
        lines: Arc<dyn OrderLineRepository>,
        orders: Arc<dyn OrderRepository>,
        items: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            lines,
            orders,
            items,
        }
    }

    /// Attaches a new line to an existing order.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order or the referenced item does not exist.
    pub async fn create(
        &self,
        order_id: i64,
        line: NewOrderLine,
    ) -> Result<OrderLine, DomainError> {
        if self.orders.find(order_id).await?.is_none() {
            return Err(DomainError::not_found("order", order_id));
        }
        self.require_item(line.item_id).await?;
        self.lines.insert(order_id, line).await
    }

    /// Loads one line.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent.
    pub async fn get(&self, id: i64) -> Result<OrderLine, DomainError> {
        self.lines
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("order line", id))
    }

    /// Loads all lines of one order.
    ///
    /// # Errors
    ///
    /// `Upstream` on persistence failure.
    pub async fn list_by_order(&self, order_id: i64) -> Result<Vec<OrderLine>, DomainError> {
        self.lines.list_by_order(order_id).await
    }

    /// Replaces a line's item reference and quantity.
    ///
    /// # Errors
    ///
    /// `NotFound` if the line or the new item does not exist.
    pub async fn update(&self, id: i64, line: NewOrderLine) -> Result<OrderLine, DomainError> {
        self.require_item(line.item_id).await?;
        self.lines
            .update(id, line)
            .await?
            .ok_or_else(|| DomainError::not_found("order line", id))
    }

    /// Deletes one line.
    ///
    /// # Errors
    ///
    /// `NotFound` if no row matched.
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if self.lines.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("order line", id))
        }
    }

    async fn require_item(&self, item_id: i64) -> Result<(), DomainError> {
        if self.items.find(item_id).await?.is_none() {
            return Err(DomainError::not_found("item", item_id));
        }
        Ok(())
    }
}
