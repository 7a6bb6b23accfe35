//! `PostgreSQL` implementation of the `OrderRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use orderflow_core::domain::{NewOrder, NewOrderLine, Order, OrderLine, OrderStatus};
use orderflow_core::error::DomainError;
use orderflow_core::repository::OrderRepository;

use crate::db_err;

/// PostgreSQL-backed order repository.
///
/// Order mutations span the order row and its lines in one transaction;
/// deletion removes the lines first, then the order row.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Creates a new `PgOrderRepository`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    status: String,
    creation_date: NaiveDate,
    payment_id: Option<Uuid>,
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

fn order_from_rows(row: OrderRow, lines: Vec<OrderLine>) -> Result<Order, DomainError> {
    let status = OrderStatus::parse(&row.status).ok_or_else(|| {
        DomainError::Upstream(format!(
            "order {} has unrecognized stored status {}",
            row.id, row.status
        ))
    })?;
    Ok(Order {
        id: row.id,
        user_id: row.user_id,
        status,
        creation_date: row.creation_date,
        payment_ref: row.payment_id,
        lines,
    })
}

async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    order_id: i64,
    lines: &[NewOrderLine],
) -> Result<Vec<OrderLine>, DomainError> {
    let mut stored = Vec::with_capacity(lines.len());
    for line in lines {
        let row: LineRow = sqlx::query_as(
            "INSERT INTO order_lines (order_id, item_id, quantity) VALUES ($1, $2, $3) \
             RETURNING id, order_id, item_id, quantity",
        )
        .bind(order_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .fetch_one(&mut **tx)
        .await
        .map_err(db_err)?;
        stored.push(row.into());
    }
    Ok(stored)
}

impl PgOrderRepository {
    async fn lines_for(&self, order_ids: &[i64]) -> Result<HashMap<i64, Vec<OrderLine>>, DomainError> {
        let rows: Vec<LineRow> = sqlx::query_as(
            "SELECT id, order_id, item_id, quantity FROM order_lines \
             WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut grouped: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

fn assemble_orders(
    rows: Vec<OrderRow>,
    mut lines: HashMap<i64, Vec<OrderLine>>,
) -> Result<Vec<Order>, DomainError> {
    rows.into_iter()
        .map(|row| {
            let order_lines = lines.remove(&row.id).unwrap_or_default();
            order_from_rows(row, order_lines)
        })
        .collect()
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert(&self, order: NewOrder, status: OrderStatus) -> Result<Order, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: OrderRow = sqlx::query_as(
            "INSERT INTO orders (user_id, status, creation_date) VALUES ($1, $2, $3) \
             RETURNING id, user_id, status, creation_date, payment_id",
        )
        .bind(order.user_id)
        .bind(status.as_str())
        .bind(order.creation_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        let lines = insert_lines(&mut tx, row.id, &order.lines).await?;
        tx.commit().await.map_err(db_err)?;

        order_from_rows(row, lines)
    }

    async fn find(&self, id: i64) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, status, creation_date, payment_id FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => {
                let mut lines = self.lines_for(&[row.id]).await?;
                let order_lines = lines.remove(&row.id).unwrap_or_default();
                Ok(Some(order_from_rows(row, order_lines)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, status, creation_date, payment_id FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let lines = self.lines_for(&ids).await?;
        assemble_orders(rows, lines)
    }

    async fn list_by_statuses(&self, statuses: &[String]) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, status, creation_date, payment_id FROM orders \
             WHERE status = ANY($1) ORDER BY id",
        )
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let lines = self.lines_for(&ids).await?;
        assemble_orders(rows, lines)
    }

    async fn replace(
        &self,
        id: i64,
        order: NewOrder,
        status: OrderStatus,
    ) -> Result<Option<Order>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<OrderRow> = sqlx::query_as(
            "UPDATE orders SET user_id = $2, creation_date = $3, status = $4 WHERE id = $1 \
             RETURNING id, user_id, status, creation_date, payment_id",
        )
        .bind(id)
        .bind(order.user_id)
        .bind(order.creation_date)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            // Nothing matched; dropping the transaction rolls back.
            return Ok(None);
        };

        sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let lines = insert_lines(&mut tx, id, &order.lines).await?;
        tx.commit().await.map_err(db_err)?;

        Ok(Some(order_from_rows(row, lines)?))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_payment(
        &self,
        id: i64,
        status: OrderStatus,
        payment_ref: Uuid,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE orders SET status = $2, payment_id = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(payment_ref)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_stored_status_is_an_upstream_error() {
        let row = OrderRow {
            id: 1,
            user_id: 1,
            status: "SHIPPED".to_string(),
            creation_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            payment_id: None,
        };
        let err = order_from_rows(row, vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));
    }

    #[test]
    fn test_order_from_rows_carries_payment_reference() {
        let payment_id = Uuid::new_v4();
        let row = OrderRow {
            id: 3,
            user_id: 9,
            status: "TO_PAY".to_string(),
            creation_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            payment_id: Some(payment_id),
        };
        let order = order_from_rows(row, vec![]).unwrap();
        assert_eq!(order.status, OrderStatus::ToPay);
        assert_eq!(order.payment_ref, Some(payment_id));
    }
}
