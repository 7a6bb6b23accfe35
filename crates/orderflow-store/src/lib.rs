//! Orderflow Store — PostgreSQL repositories.
//!
//! All order mutations run in explicit transactions spanning the order row
//! and its lines; cascades are explicit deletes, not ORM behavior, and
//! lines are loaded with explicit queries rather than lazy proxies.

pub mod pg_item_repository;
pub mod pg_order_line_repository;
pub mod pg_order_repository;
pub mod schema;

pub use pg_item_repository::PgItemRepository;
pub use pg_order_line_repository::PgOrderLineRepository;
pub use pg_order_repository::PgOrderRepository;

use orderflow_core::error::DomainError;

/// Maps a driver error onto the domain's upstream kind.
pub(crate) fn db_err(err: sqlx::Error) -> DomainError {
    DomainError::Upstream(format!("database error: {err}"))
}
