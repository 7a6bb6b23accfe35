//! Order-event publishing abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::message::OrderMessage;

/// Publishes order-created/order-changed events to the orders topic.
///
/// Publish failures propagate to the caller and fail the surrounding
/// request; there is no fire-and-forget path.
#[async_trait]
pub trait OrderEventPublisher: Send + Sync {
    /// Publishes one order event, keyed by order id for partition affinity.
    async fn publish(&self, message: &OrderMessage) -> Result<(), DomainError>;
}
