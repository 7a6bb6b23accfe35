//! `PostgreSQL` implementation of the `ItemRepository` trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use orderflow_core::domain::{Item, NewItem};
use orderflow_core::error::DomainError;
use orderflow_core::repository::ItemRepository;

use crate::db_err;

/// PostgreSQL-backed item repository.
#[derive(Debug, Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    /// Creates a new `PgItemRepository`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    price: Decimal,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
        }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item, DomainError> {
        let row: ItemRow = sqlx::query_as(
            "INSERT INTO items (name, price) VALUES ($1, $2) RETURNING id, name, price",
        )
        .bind(&item.name)
        .bind(item.price)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Item>, DomainError> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, price FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<Item>, DomainError> {
        let rows: Vec<ItemRow> =
            sqlx::query_as("SELECT id, name, price FROM items WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list(&self) -> Result<Vec<Item>, DomainError> {
        let rows: Vec<ItemRow> = sqlx::query_as("SELECT id, name, price FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, item: NewItem) -> Result<Option<Item>, DomainError> {
        let row: Option<ItemRow> = sqlx::query_as(
            "UPDATE items SET name = $2, price = $3 WHERE id = $1 RETURNING id, name, price",
        )
        .bind(id)
        .bind(&item.name)
        .bind(item.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
