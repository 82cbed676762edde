//! PostgreSQL order store.

use super::{OrderStore, RowStream, StoreError};
use crate::model::{AccountId, Order, OrderId, OrderRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use std::time::Duration;

/// Line items per multi-row INSERT. Three binds each keeps well under the
/// 65535 bind-parameter limit.
const LINE_ITEMS_PER_INSERT: usize = 1000;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id CHAR(26) PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL,
    account_id TEXT NOT NULL,
    total_price NUMERIC NOT NULL
)"#;

const CREATE_ORDER_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS order_products (
    order_id CHAR(26) REFERENCES orders (id) ON DELETE CASCADE,
    product_id TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    PRIMARY KEY (order_id, product_id)
)"#;

const SELECT_ROWS_FOR_ACCOUNT: &str = r#"
SELECT o.id AS order_id, o.created_at, o.account_id, o.total_price,
       op.product_id, op.quantity
FROM orders o
JOIN order_products op ON op.order_id = o.id
WHERE o.account_id = $1
ORDER BY o.id, op.product_id"#;

#[derive(sqlx::FromRow)]
struct StoredRow {
    order_id: String,
    created_at: DateTime<Utc>,
    account_id: String,
    total_price: Decimal,
    product_id: String,
    quantity: i32,
}

impl TryFrom<StoredRow> for OrderRow {
    type Error = StoreError;

    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let order_id: OrderId = row
            .order_id
            .trim_end()
            .parse()
            .map_err(|e| StoreError::Decode(format!("order id {:?}: {e}", row.order_id)))?;
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            StoreError::Decode(format!("quantity {} in order {order_id}", row.quantity))
        })?;
        Ok(Self {
            order_id,
            created_at: row.created_at,
            account_id: row.account_id.into(),
            total_price: row.total_price,
            product_id: row.product_id.into(),
            quantity,
        })
    }
}

/// Order store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `orders` and `order_products` tables if they are missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ORDERS).execute(&self.pool).await?;
        sqlx::query(CREATE_ORDER_PRODUCTS).execute(&self.pool).await?;
        tracing::info!("Order tables ready");
        Ok(())
    }

    async fn insert_order(
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<(), StoreError> {
        let order_id = order.id().to_string();

        sqlx::query(
            "INSERT INTO orders (id, created_at, account_id, total_price) VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id.as_str())
        .bind(order.created_at())
        .bind(order.account_id().as_str())
        .bind(order.total_price())
        .execute(&mut **tx)
        .await?;

        for chunk in order.line_items().chunks(LINE_ITEMS_PER_INSERT) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO order_products (order_id, product_id, quantity) ",
            );
            // Bound as INT8; anything above MAX_QUANTITY is refused by the INTEGER column
            builder.push_values(chunk, |mut row, item| {
                row.push_bind(order_id.clone())
                    .push_bind(item.product_id.as_str().to_owned())
                    .push_bind(i64::from(item.quantity));
            });
            builder.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn persist(&self, order: &Order) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Err(e) = Self::insert_order(&mut tx, order).await {
            tracing::warn!(order_id = %order.id(), error = %e, "Insert failed, rolling back");
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(
                    order_id = %order.id(),
                    error = %rollback,
                    insert_error = %e,
                    "Rollback failed"
                );
            }
            return Err(e);
        }

        tx.commit().await?;
        tracing::info!(
            order_id = %order.id(),
            items = order.line_items().len(),
            "Persisted"
        );
        Ok(())
    }

    fn rows_for_account<'a>(&'a self, account_id: &'a AccountId) -> RowStream<'a> {
        sqlx::query_as::<_, StoredRow>(SELECT_ROWS_FOR_ACCOUNT)
            .bind(account_id.as_str())
            .fetch(&self.pool)
            .map(|row| row.map_err(StoreError::from).and_then(OrderRow::try_from))
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(order_id: &str, quantity: i32) -> StoredRow {
        StoredRow {
            order_id: order_id.to_string(),
            created_at: Utc::now(),
            account_id: "acc_1".to_string(),
            total_price: Decimal::ONE,
            product_id: "p1".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_decodes_padded_order_id() {
        let id = OrderId::new();
        let row = OrderRow::try_from(stored(&format!("{id} "), 2)).unwrap();
        assert_eq!(row.order_id, id);
        assert_eq!(row.quantity, 2);

        let largest = OrderRow::try_from(stored(&id.to_string(), i32::MAX)).unwrap();
        assert_eq!(largest.quantity, crate::model::MAX_QUANTITY);
    }

    #[test]
    fn test_rejects_malformed_rows() {
        assert!(matches!(
            OrderRow::try_from(stored("not-a-ulid", 1)),
            Err(StoreError::Decode(_))
        ));
        assert!(matches!(
            OrderRow::try_from(stored(&OrderId::new().to_string(), -1)),
            Err(StoreError::Decode(_))
        ));
    }
}
