//! Order-event producer.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use tracing::{error, info};

use orderflow_core::error::DomainError;
use orderflow_core::message::OrderMessage;
use orderflow_core::publisher::OrderEventPublisher;

/// Publishes order events to the orders topic as JSON, keyed by order id so
/// all events for one order land on the same partition.
pub struct KafkaOrderProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaOrderProducer {
    /// Creates a producer against `brokers` publishing to `topic`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` if the underlying producer cannot be
    /// created.
    pub fn new(
        brokers: &str,
        topic: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "all")
            .create()
            .map_err(|e| DomainError::Upstream(format!("failed to create producer: {e}")))?;

        Ok(Self {
            producer,
            topic: topic.into(),
            timeout,
        })
    }
}

#[async_trait]
impl OrderEventPublisher for KafkaOrderProducer {
    async fn publish(&self, message: &OrderMessage) -> Result<(), DomainError> {
        let payload = serde_json::to_vec(message)
            .map_err(|e| DomainError::Upstream(format!("failed to encode order event: {e}")))?;
        let key = message.order_id.to_string();

        let record = FutureRecord::to(&self.topic).payload(&payload).key(&key);

        match self.producer.send(record, Timeout::After(self.timeout)).await {
            Ok((partition, offset)) => {
                info!(
                    topic = %self.topic,
                    partition,
                    offset,
                    order_id = message.order_id,
                    "order event sent"
                );
                Ok(())
            }
            Err((kafka_error, _)) => {
                error!(
                    topic = %self.topic,
                    order_id = message.order_id,
                    error = %kafka_error,
                    "failed to send order event"
                );
                Err(DomainError::Upstream(format!(
                    "failed to send order event: {kafka_error}"
                )))
            }
        }
    }
}
