//! Orderflow Kafka — order-event producer and payment-event consumer.
//!
//! Delivery semantics:
//! - Producer side: order events are sent with a bounded timeout and the
//!   result is awaited; a send failure fails the surrounding request.
//! - Consumer side: at-least-once with manual commits. Offsets are
//!   committed only after the payment event has been handled (or routed to
//!   the dead-letter topic), so a crash before commit redelivers. A failed
//!   dead-letter publish also leaves the offset uncommitted. The
//!   payment-created guard in the order service makes redelivery safe.

pub mod consumer;
pub mod producer;

pub use consumer::PaymentConsumer;
pub use producer::KafkaOrderProducer;
