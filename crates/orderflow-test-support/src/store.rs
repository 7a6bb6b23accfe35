//! In-memory repositories backed by mutex-guarded maps.
//!
//! These mirror the Postgres repositories closely enough for service and
//! route tests: ids are assigned sequentially, order mutations are atomic
//! under one lock, and deleting an order removes its lines.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use orderflow_core::domain::{
    Item, NewItem, NewOrder, NewOrderLine, Order, OrderLine, OrderStatus,
};
use orderflow_core::error::DomainError;
use orderflow_core::repository::{ItemRepository, OrderLineRepository, OrderRepository};

/// In-memory `ItemRepository`.
#[derive(Debug, Default)]
pub struct InMemoryItems {
    items: Mutex<BTreeMap<i64, Item>>,
    next_id: Mutex<i64>,
}

impl InMemoryItems {
    /// Creates an empty item store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one item and returns its assigned id.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed(&self, item: NewItem) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let id = *next;
        self.items.lock().unwrap().insert(
            id,
            Item {
                id,
                name: item.name,
                price: item.price,
            },
        );
        id
    }
}

#[async_trait]
impl ItemRepository for InMemoryItems {
    async fn insert(&self, item: NewItem) -> Result<Item, DomainError> {
        let id = self.seed(item);
        Ok(self.items.lock().unwrap()[&id].clone())
    }

    async fn find(&self, id: i64) -> Result<Option<Item>, DomainError> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Item>, DomainError> {
        let items = self.items.lock().unwrap();
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Item>, DomainError> {
        Ok(self.items.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, id: i64, item: NewItem) -> Result<Option<Item>, DomainError> {
        let mut items = self.items.lock().unwrap();
        Ok(items.get_mut(&id).map(|existing| {
            existing.name = item.name;
            existing.price = item.price;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.items.lock().unwrap().remove(&id).is_some())
    }
}

/// In-memory order store implementing both `OrderRepository` and
/// `OrderLineRepository`, so lines added through either path stay attached
/// to their order.
#[derive(Debug, Default)]
pub struct InMemoryOrders {
    orders: Mutex<BTreeMap<i64, Order>>,
    next_order_id: Mutex<i64>,
    next_line_id: Mutex<i64>,
}

impl InMemoryOrders {
    /// Creates an empty order store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_line_id(&self) -> i64 {
        let mut next = self.next_line_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn build_lines(&self, order_id: i64, lines: &[NewOrderLine]) -> Vec<OrderLine> {
        lines
            .iter()
            .map(|line| OrderLine {
                id: self.next_line_id(),
                order_id,
                item_id: line.item_id,
                quantity: line.quantity,
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn insert(&self, order: NewOrder, status: OrderStatus) -> Result<Order, DomainError> {
        let id = {
            let mut next = self.next_order_id.lock().unwrap();
            *next += 1;
            *next
        };
        let stored = Order {
            id,
            user_id: order.user_id,
            status,
            creation_date: order.creation_date,
            payment_ref: None,
            lines: self.build_lines(id, &order.lines),
        };
        self.orders.lock().unwrap().insert(id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: i64) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().values().cloned().collect())
    }

    async fn list_by_statuses(&self, statuses: &[String]) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|order| statuses.iter().any(|s| s == order.status.as_str()))
            .cloned()
            .collect())
    }

    async fn replace(
        &self,
        id: i64,
        order: NewOrder,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError> {
        let lines = self.build_lines(id, &order.lines);
        let mut orders = self.orders.lock().unwrap();
        Ok(orders.get_mut(&id).map(|existing| {
            existing.user_id = order.user_id;
            existing.creation_date = order.creation_date;
            existing.lines = lines;
            existing.status = status;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.orders.lock().unwrap().remove(&id).is_some())
    }

    async fn set_payment(
        &self,
        id: i64,
        status: OrderStatus,
        payment_ref: Uuid,
    ) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                order.payment_ref = Some(payment_ref);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OrderLineRepository for InMemoryOrders {
    async fn insert(&self, order_id: i64, line: NewOrderLine) -> Result<OrderLine, DomainError> {
        let stored = OrderLine {
            id: self.next_line_id(),
            order_id,
            item_id: line.item_id,
            quantity: line.quantity,
        };
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(&order_id)
            .ok_or_else(|| DomainError::Upstream(format!("no order row {order_id}")))?;
        order.lines.push(stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: i64) -> Result<Option<OrderLine>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .flat_map(|order| order.lines.iter())
            .find(|line| line.id == id)
            .cloned())
    }

    async fn list_by_order(&self, order_id: i64) -> Result<Vec<OrderLine>, DomainError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .get(&order_id)
            .map(|order| order.lines.clone())
            .unwrap_or_default())
    }

    async fn update(&self, id: i64, line: NewOrderLine) -> Result<Option<OrderLine>, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        for order in orders.values_mut() {
            if let Some(existing) = order.lines.iter_mut().find(|l| l.id == id) {
                existing.item_id = line.item_id;
                existing.quantity = line.quantity;
                return Ok(Some(existing.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        for order in orders.values_mut() {
            let before = order.lines.len();
            order.lines.retain(|line| line.id != id);
            if order.lines.len() < before {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
