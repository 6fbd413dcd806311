//! Postgres-backed order store.
//!
//! An order and its line items are written in one transaction, so a failed
//! save never leaves a partial order behind.
//!
//! | SQLx error | Postgres code | OrderStoreError |
//! |---|---|---|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | PoolClosed / PoolTimedOut / Io / Tls | n/a | `Unavailable` |
//! | anything else | any | `Write` |

use std::sync::Arc;

use sqlx::PgPool;
use tracing::instrument;

use microshop_orders::Order;

use super::{OrderStore, OrderStoreError};

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        order_number UUID PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_line_items (
        order_number UUID NOT NULL REFERENCES orders (order_number),
        line_no INTEGER NOT NULL,
        sku_code TEXT NOT NULL,
        price NUMERIC(19, 2) NOT NULL CHECK (price >= 0),
        quantity BIGINT NOT NULL CHECK (quantity >= 0),
        PRIMARY KEY (order_number, line_no)
    )
    "#,
];

#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the order tables when they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), OrderStoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "ensure_schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(skip(self, order), fields(order_id = %order.id(), lines = order.line_items().len()), err)]
    async fn save(&self, order: &Order) -> Result<(), OrderStoreError> {
        let order_id = *order.id().as_uuid();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, &order_id.to_string()))?;

        sqlx::query("INSERT INTO orders (order_number) VALUES ($1)")
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, &order_id.to_string()))?;

        for (idx, item) in order.line_items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_line_items (order_number, line_no, sku_code, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id)
            .bind(idx as i32 + 1)
            .bind(item.sku().as_str())
            .bind(item.price())
            .bind(item.quantity())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, &order_id.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, &order_id.to_string()))?;
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error, context: &str) -> OrderStoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            OrderStoreError::Duplicate(context.to_string())
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            OrderStoreError::Unavailable("connection pool unavailable".to_string())
        }
        sqlx::Error::Io(e) => OrderStoreError::Unavailable(format!("io error: {e}")),
        sqlx::Error::Tls(e) => OrderStoreError::Unavailable(format!("tls error: {e}")),
        other => OrderStoreError::Write(other.to_string()),
    }
}
