//! Postgres-backed stock store.
//!
//! Table `inventory (sku_code TEXT PRIMARY KEY, quantity BIGINT NOT NULL CHECK (quantity >= 0))`.
//!
//! Connection-level failures (pool closed, pool timeout, IO, TLS) map to
//! `StockStoreError::Unavailable`; everything else maps to `Query`.

use std::collections::BTreeSet;
use std::sync::Arc;

use sqlx::{PgPool, Row};
use tracing::instrument;

use microshop_core::Sku;
use microshop_inventory::StockRecord;

use super::{StockStore, StockStoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS inventory (
    sku_code TEXT PRIMARY KEY,
    quantity BIGINT NOT NULL CHECK (quantity >= 0)
)
"#;

#[derive(Debug, Clone)]
pub struct PostgresStockStore {
    pool: Arc<PgPool>,
}

impl PostgresStockStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `inventory` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StockStoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl StockStore for PostgresStockStore {
    #[instrument(skip(self, codes), fields(codes = codes.len()), err)]
    async fn find_by_codes(&self, codes: &BTreeSet<Sku>) -> Result<Vec<StockRecord>, StockStoreError> {
        let codes: Vec<String> = codes.iter().map(|c| c.as_str().to_string()).collect();

        let rows = sqlx::query("SELECT sku_code, quantity FROM inventory WHERE sku_code = ANY($1)")
            .bind(codes)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_codes", e))?;

        rows.into_iter()
            .map(|row| {
                let code: String = row
                    .try_get("sku_code")
                    .map_err(|e| map_sqlx_error("find_by_codes", e))?;
                let quantity: i64 = row
                    .try_get("quantity")
                    .map_err(|e| map_sqlx_error("find_by_codes", e))?;
                let sku = Sku::parse(code).map_err(|e| StockStoreError::Query(e.to_string()))?;
                StockRecord::new(sku, quantity).map_err(|e| StockStoreError::Query(e.to_string()))
            })
            .collect()
    }

    #[instrument(skip(self), fields(sku = %record.sku()), err)]
    async fn upsert(&self, record: StockRecord) -> Result<(), StockStoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory (sku_code, quantity)
            VALUES ($1, $2)
            ON CONFLICT (sku_code) DO UPDATE SET quantity = EXCLUDED.quantity
            "#,
        )
        .bind(record.sku().as_str())
        .bind(record.quantity_on_hand())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StockStoreError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StockStoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => StockStoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StockStoreError::Unavailable(format!("tls error in {operation}: {e}")),
        other => StockStoreError::Query(format!("{operation}: {other}")),
    }
}
