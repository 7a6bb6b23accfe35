//! Orderflow API — axum HTTP surface for the order-management service.

pub mod error;
pub mod routes;
pub mod state;
pub mod validate;
