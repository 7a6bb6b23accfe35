//! Order assembly service and payment state machine.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use orderflow_core::domain::{Item, NewOrder, Order, OrderLine, OrderStatus};
use orderflow_core::error::DomainError;
use orderflow_core::message::{OrderMessage, PaymentMessage, PaymentStatus};
use orderflow_core::publisher::OrderEventPublisher;
use orderflow_core::repository::{ItemRepository, OrderRepository};
use orderflow_core::user::UserDirectory;

use crate::view::{OrderLineView, OrderView, OrderWithUser};

/// Composes orders, lines, and user profiles; publishes order events; and
/// applies payment lifecycle transitions.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserDirectory>,
    publisher: Arc<dyn OrderEventPublisher>,
}

impl OrderService {
    /// Creates a service over the given collaborators.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserDirectory>,
        publisher: Arc<dyn OrderEventPublisher>,
    ) -> Self {
        Self {
            orders,
            items,
            users,
            publisher,
        }
    }

    /// Creates an order with status `CREATED`, publishes the order event
    /// with the computed total, and returns the assembled view.
    ///
    /// # Errors
    ///
    /// `NotFound` if any referenced item or the owning user does not exist
    /// (no order row is persisted when an item is missing); `Upstream` if
    /// persistence or the event publish fails.
    pub async fn create(&self, order: NewOrder) -> Result<OrderWithUser, DomainError> {
        let items = self.resolve_items(&order).await?;
        let saved = self.orders.insert(order, OrderStatus::Created).await?;

        self.publish_event(&saved, &items).await?;

        let user = self.users.user_by_id(saved.user_id).await?;
        Ok(OrderWithUser {
            order: assemble_view(saved, &items),
            user,
        })
    }

    /// Loads one order with its owner's profile.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order is absent, or if its user has been deleted
    /// out from under it.
    pub async fn get(&self, id: i64) -> Result<OrderWithUser, DomainError> {
        let order = self
            .orders
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", id))?;
        let items = self.items_for(std::slice::from_ref(&order)).await?;
        let user = self.users.user_by_id(order.user_id).await?;
        Ok(OrderWithUser {
            order: assemble_view(order, &items),
            user,
        })
    }

    /// Lists all orders with user profiles attached. Orders whose user
    /// lookup fails with not-found are dropped from the result rather than
    /// failing the whole call.
    ///
    /// # Errors
    ///
    /// `Upstream` if persistence or the user service fails outright.
    pub async fn list(&self) -> Result<Vec<OrderWithUser>, DomainError> {
        let orders = self.orders.list().await?;
        self.assemble_all(orders).await
    }

    /// Same best-effort semantics as [`Self::list`], filtered by exact
    /// status string match.
    ///
    /// # Errors
    ///
    /// `Upstream` if persistence or the user service fails outright.
    pub async fn list_by_statuses(
        &self,
        statuses: &[String],
    ) -> Result<Vec<OrderWithUser>, DomainError> {
        let orders = self.orders.list_by_statuses(statuses).await?;
        self.assemble_all(orders).await
    }

    /// Replaces an order's owner, date, and entire line set, marks it
    /// `CHANGED`, and republishes the order event with the recomputed total.
    ///
    /// # Errors
    ///
    /// `NotFound` if the order, any referenced item, or the owning user is
    /// absent; `Upstream` on persistence or publish failure.
    pub async fn update(&self, id: i64, order: NewOrder) -> Result<OrderWithUser, DomainError> {
        if self.orders.find(id).await?.is_none() {
            return Err(DomainError::not_found("order", id));
        }
        let items = self.resolve_items(&order).await?;
        let updated = self
            .orders
            .replace(id, order, OrderStatus::Changed)
            .await?
            .ok_or_else(|| DomainError::not_found("order", id))?;

        self.publish_event(&updated, &items).await?;

        let user = self.users.user_by_id(updated.user_id).await?;
        Ok(OrderWithUser {
            order: assemble_view(updated, &items),
            user,
        })
    }

    /// Deletes an order and its lines.
    ///
    /// # Errors
    ///
    /// `NotFound` if no order row matched; repeated deletes of the same id
    /// after the first succeed return `NotFound`.
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if self.orders.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("order", id))
        }
    }

    /// Applies one inbound payment event to its order.
    ///
    /// Events referencing unknown orders are logged at error level and
    /// ignored; the payment producer may be ahead of or behind this
    /// service's view of orders, and such events are not retried. Unknown
    /// status spellings are logged and ignored.
    ///
    /// # Errors
    ///
    /// `Upstream` only on persistence failure; lookup misses never
    /// propagate.
    pub async fn apply_payment(&self, event: &PaymentMessage) -> Result<(), DomainError> {
        let Some(order) = self.orders.find(event.order_id).await? else {
            error!(
                order_id = event.order_id,
                payment_id = %event.payment_id,
                "payment event references unknown order"
            );
            return Ok(());
        };

        match PaymentStatus::parse(&event.status) {
            Some(PaymentStatus::Created) => {
                if order.payment_ref.is_some() {
                    warn!(
                        order_id = order.id,
                        payment_id = %event.payment_id,
                        "duplicate payment-created event, payment reference already set"
                    );
                    return Ok(());
                }
                self.transition(order.id, OrderStatus::ToPay, event).await
            }
            // Terminal outcomes are authoritative: the reference is
            // overwritten even if a different payment attached earlier.
            Some(PaymentStatus::Success) => self.transition(order.id, OrderStatus::Paid, event).await,
            Some(PaymentStatus::Failed) => {
                self.transition(order.id, OrderStatus::Failed, event).await
            }
            None => {
                warn!(
                    order_id = order.id,
                    status = %event.status,
                    "no processing for payment status"
                );
                Ok(())
            }
        }
    }

    async fn transition(
        &self,
        order_id: i64,
        status: OrderStatus,
        event: &PaymentMessage,
    ) -> Result<(), DomainError> {
        if self
            .orders
            .set_payment(order_id, status, event.payment_id)
            .await?
        {
            info!(order_id, status = %status, payment_id = %event.payment_id, "updated order from payment event");
        } else {
            error!(order_id, "order disappeared while applying payment event");
        }
        Ok(())
    }

    /// Resolves every line's item, failing on the first missing one.
    async fn resolve_items(&self, order: &NewOrder) -> Result<HashMap<i64, Item>, DomainError> {
        let ids: Vec<i64> = order.lines.iter().map(|line| line.item_id).collect();
        let found: HashMap<i64, Item> = self
            .items
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();
        for id in &ids {
            if !found.contains_key(id) {
                return Err(DomainError::not_found("item", id));
            }
        }
        Ok(found)
    }

    /// Loads the items referenced by the given orders, tolerating misses.
    async fn items_for(&self, orders: &[Order]) -> Result<HashMap<i64, Item>, DomainError> {
        let mut ids: Vec<i64> = orders
            .iter()
            .flat_map(|order| order.lines.iter().map(|line| line.item_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(self
            .items
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect())
    }

    async fn assemble_all(&self, orders: Vec<Order>) -> Result<Vec<OrderWithUser>, DomainError> {
        let items = self.items_for(&orders).await?;
        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            match self.users.user_by_id(order.user_id).await {
                Ok(user) => views.push(OrderWithUser {
                    order: assemble_view(order, &items),
                    user,
                }),
                Err(DomainError::NotFound(_)) => {
                    // Best-effort listing: a stale user reference drops the
                    // order from the result instead of failing the call.
                    warn!(order_id = order.id, user_id = order.user_id, "dropping order with stale user reference from listing");
                }
                Err(other) => return Err(other),
            }
        }
        Ok(views)
    }

    async fn publish_event(
        &self,
        order: &Order,
        items: &HashMap<i64, Item>,
    ) -> Result<(), DomainError> {
        let message = OrderMessage {
            order_id: order.id,
            user_id: order.user_id,
            total_amount: total_amount(&order.lines, items),
        };
        self.publisher.publish(&message).await?;
        info!(order_id = order.id, total = %message.total_amount, "order event published");
        Ok(())
    }
}

/// Sum of price * quantity in decimal precision over lines whose item
/// resolved. Lines with no resolvable item contribute zero.
fn total_amount(lines: &[OrderLine], items: &HashMap<i64, Item>) -> Decimal {
    lines
        .iter()
        .filter_map(|line| {
            items
                .get(&line.item_id)
                .map(|item| item.price * Decimal::from(line.quantity))
        })
        .sum()
}

fn assemble_view(order: Order, items: &HashMap<i64, Item>) -> OrderView {
    OrderView {
        id: order.id,
        user_id: order.user_id,
        status: order.status,
        creation_date: order.creation_date,
        lines: order
            .lines
            .into_iter()
            .map(|line| OrderLineView {
                id: line.id,
                item: items.get(&line.item_id).cloned(),
                quantity: line.quantity,
            })
            .collect(),
    }
}
