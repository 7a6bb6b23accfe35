//! Payment-event consumer loop.

use std::sync::Arc;
use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use tracing::{error, info, warn};

use orderflow_core::error::DomainError;
use orderflow_core::message::PaymentMessage;
use orderflow_orders::service::OrderService;

/// Consumer group shared by all instances of this service.
const CONSUMER_GROUP: &str = "order-group";

/// Fixed backoff between processing attempts for one event.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Attempts per event before it is routed to the dead-letter topic.
const MAX_ATTEMPTS: u32 = 4;

/// Consumes payment lifecycle events and applies them to orders.
///
/// Manual commits, committed only after an event is handled or
/// dead-lettered: at-least-once delivery. Events that keep failing after
/// the bounded retries go to the dead-letter topic on the same partition
/// they arrived on. If the dead-letter publish itself fails, the offset is
/// left uncommitted so the event is redelivered.
pub struct PaymentConsumer {
    consumer: StreamConsumer,
    dlq: FutureProducer,
    dead_topic: String,
    service: Arc<OrderService>,
}

impl PaymentConsumer {
    /// Creates a consumer subscribed to `payments_topic`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` if the consumer or the dead-letter
    /// producer cannot be created, or the subscription fails.
    pub fn new(
        brokers: &str,
        payments_topic: &str,
        dead_topic: impl Into<String>,
        service: Arc<OrderService>,
    ) -> Result<Self, DomainError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", CONSUMER_GROUP)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .create()
            .map_err(|e| DomainError::Upstream(format!("failed to create consumer: {e}")))?;

        consumer
            .subscribe(&[payments_topic])
            .map_err(|e| DomainError::Upstream(format!("failed to subscribe: {e}")))?;

        let dlq: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| {
                DomainError::Upstream(format!("failed to create dead-letter producer: {e}"))
            })?;

        info!(topic = payments_topic, group = CONSUMER_GROUP, "subscribed to payments topic");

        Ok(Self {
            consumer,
            dlq,
            dead_topic: dead_topic.into(),
            service,
        })
    }

    /// Runs the consume loop until the underlying stream ends.
    ///
    /// Offsets are committed only when `handle` reports the event as fully
    /// processed; an unhandled event stays uncommitted and is redelivered.
    pub async fn run(self) {
        loop {
            match self.consumer.recv().await {
                Ok(message) => match self.handle(&message).await {
                    Ok(()) => {
                        if let Err(e) = self.consumer.commit_message(&message, CommitMode::Async) {
                            warn!(error = %e, "failed to commit payment message offset");
                        }
                    }
                    Err(e) => {
                        error!(
                            partition = message.partition(),
                            offset = message.offset(),
                            error = %e,
                            "payment event not handled, leaving offset uncommitted"
                        );
                    }
                },
                Err(e) => {
                    error!(error = %e, "payment consumer stream error");
                }
            }
        }
    }

    /// Processes one message to completion.
    ///
    /// # Errors
    ///
    /// `Upstream` if the event could be neither applied nor dead-lettered;
    /// the caller must not commit the offset in that case.
    async fn handle(&self, message: &BorrowedMessage<'_>) -> Result<(), DomainError> {
        let Some(payload) = message.payload() else {
            warn!(
                partition = message.partition(),
                offset = message.offset(),
                "payment message has no payload"
            );
            return Ok(());
        };

        let event = match decode_payment(payload) {
            Ok(event) => event,
            Err(e) => {
                error!(
                    partition = message.partition(),
                    offset = message.offset(),
                    error = %e,
                    "undecodable payment message, routing to dead-letter topic"
                );
                return self.dead_letter(message, payload).await;
            }
        };

        if let Err(e) = apply_with_retry(&self.service, &event).await {
            error!(
                order_id = event.order_id,
                payment_id = %event.payment_id,
                error = %e,
                "payment event exhausted retries, routing to dead-letter topic"
            );
            return self.dead_letter(message, payload).await;
        }
        Ok(())
    }

    /// Forwards the original payload to the dead-letter topic, preserving
    /// the source partition.
    ///
    /// # Errors
    ///
    /// `Upstream` if the dead-letter publish fails.
    async fn dead_letter(
        &self,
        message: &BorrowedMessage<'_>,
        payload: &[u8],
    ) -> Result<(), DomainError> {
        let mut record = FutureRecord::to(&self.dead_topic)
            .partition(message.partition())
            .payload(payload);
        if let Some(key) = message.key() {
            record = record.key(key);
        }

        match self
            .dlq
            .send(record, Timeout::After(Duration::from_secs(5)))
            .await
        {
            Ok(_) => Ok(()),
            Err((e, _)) => {
                error!(
                    topic = %self.dead_topic,
                    partition = message.partition(),
                    offset = message.offset(),
                    error = %e,
                    "failed to dead-letter payment message"
                );
                Err(DomainError::Upstream(format!(
                    "failed to dead-letter payment message: {e}"
                )))
            }
        }
    }
}

/// Applies one payment event with bounded fixed-backoff retries.
async fn apply_with_retry(
    service: &OrderService,
    event: &PaymentMessage,
) -> Result<(), DomainError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match service.apply_payment(event).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!(
                    order_id = event.order_id,
                    payment_id = %event.payment_id,
                    attempt,
                    error = %e,
                    "failed to apply payment event"
                );
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decodes a payments-topic payload.
///
/// # Errors
///
/// Returns the JSON error for payloads that do not match the payment
/// message schema.
pub fn decode_payment(payload: &[u8]) -> Result<PaymentMessage, serde_json::Error> {
    serde_json::from_slice(payload)
}
