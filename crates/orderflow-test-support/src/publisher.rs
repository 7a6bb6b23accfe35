//! Fake order-event publishers.

use std::sync::Mutex;

use async_trait::async_trait;

use orderflow_core::error::DomainError;
use orderflow_core::message::OrderMessage;
use orderflow_core::publisher::OrderEventPublisher;

/// A publisher that records every message and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    sent: Mutex<Vec<OrderMessage>>,
}

impl RecordingPublisher {
    /// Creates an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all published messages.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<OrderMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderEventPublisher for RecordingPublisher {
    async fn publish(&self, message: &OrderMessage) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A publisher that always fails with an upstream error.
#[derive(Debug)]
pub struct FailingPublisher;

#[async_trait]
impl OrderEventPublisher for FailingPublisher {
    async fn publish(&self, _message: &OrderMessage) -> Result<(), DomainError> {
        Err(DomainError::Upstream("broker unavailable".into()))
    }
}
