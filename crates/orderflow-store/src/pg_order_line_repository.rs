//! `PostgreSQL` implementation of the `OrderLineRepository` trait.

use async_trait::async_trait;
use sqlx::PgPool;

use orderflow_core::domain::{NewOrderLine, OrderLine};
use orderflow_core::error::DomainError;
use orderflow_core::repository::OrderLineRepository;

use crate::db_err;

/// PostgreSQL-backed order-line repository.
#[derive(Debug, Clone)]
pub struct PgOrderLineRepository {
    pool: PgPool,
}

impl PgOrderLineRepository {
    /// Creates a new `PgOrderLineRepository`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LineRow {
    id: i64,
    order_id: i64,
    item_id: i64,
    quantity: i32,
}

impl From<LineRow> for OrderLine {
    fn from(row: LineRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            item_id: row.item_id,
            quantity: row.quantity,
        }
    }
}

#[async_trait]
impl OrderLineRepository for PgOrderLineRepository {
    async fn insert(&self, order_id: i64, line: NewOrderLine) -> Result<OrderLine, DomainError> {
        let row: LineRow = sqlx::query_as(
            "INSERT INTO order_lines (order_id, item_id, quantity) VALUES ($1, $2, $3) \
             RETURNING id, order_id, item_id, quantity",
        )
        .bind(order_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<OrderLine>, DomainError> {
        let row: Option<LineRow> = sqlx::query_as(
            "SELECT id, order_id, item_id, quantity FROM order_lines WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_order(&self, order_id: i64) -> Result<Vec<OrderLine>, DomainError> {
        let rows: Vec<LineRow> = sqlx::query_as(
            "SELECT id, order_id, item_id, quantity FROM order_lines \
             WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, line: NewOrderLine) -> Result<Option<OrderLine>, DomainError> {
        let row: Option<LineRow> = sqlx::query_as(
            "UPDATE order_lines SET item_id = $2, quantity = $3 WHERE id = $1 \
             RETURNING id, order_id, item_id, quantity",
        )
        .bind(id)
        .bind(line.item_id)
        .bind(line.quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM order_lines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
