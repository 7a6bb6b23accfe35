//! Order service database schema.

use sqlx::PgPool;

use orderflow_core::error::DomainError;

use crate::db_err;

/// SQL to create the items, orders, and order_lines tables.
///
/// `order_lines.order_id` carries a plain foreign key without `ON DELETE
/// CASCADE`: order deletion removes lines explicitly inside the repository
/// transaction.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS items (
    id      BIGSERIAL PRIMARY KEY,
    name    VARCHAR(128) NOT NULL,
    price   NUMERIC(12, 2) NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id            BIGSERIAL PRIMARY KEY,
    user_id       BIGINT NOT NULL,
    status        VARCHAR(32) NOT NULL,
    creation_date DATE NOT NULL,
    payment_id    UUID
);

CREATE TABLE IF NOT EXISTS order_lines (
    id       BIGSERIAL PRIMARY KEY,
    order_id BIGINT NOT NULL REFERENCES orders (id),
    item_id  BIGINT NOT NULL REFERENCES items (id),
    quantity INTEGER NOT NULL CHECK (quantity >= 1)
);

CREATE INDEX IF NOT EXISTS idx_order_lines_order_id
    ON order_lines (order_id);

CREATE INDEX IF NOT EXISTS idx_orders_status
    ON orders (status);
";

/// Applies the schema. Idempotent; run once at startup.
///
/// # Errors
///
/// Returns `DomainError::Upstream` if any DDL statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::raw_sql(CREATE_TABLES)
        .execute(pool)
        .await
        .map_err(db_err)?;
    Ok(())
}
