//! Orderflow Orders — order assembly and payment lifecycle.
//!
//! [`service::OrderService`] composes orders, their lines, and the owner's
//! user profile into response views, computes order totals in decimal
//! precision, publishes order events, and drives status transitions from
//! inbound payment events. [`lines::LineService`] covers the standalone
//! order-line operations.

pub mod lines;
pub mod service;
pub mod view;
