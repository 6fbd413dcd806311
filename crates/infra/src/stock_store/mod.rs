//! Stock storage: the Stock Query Service's source of on-hand quantities.

pub mod in_memory;
pub mod postgres;

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use microshop_core::Sku;
use microshop_inventory::StockRecord;

pub use in_memory::InMemoryStockStore;
pub use postgres::PostgresStockStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockStoreError {
    /// The backing store could not be reached (pool closed, IO, timeout).
    #[error("stock store unavailable: {0}")]
    Unavailable(String),
    /// A query failed or returned rows that violate domain rules.
    #[error("stock store query failed: {0}")]
    Query(String),
}

/// Keyed access to stock records.
#[async_trait::async_trait]
pub trait StockStore: Send + Sync {
    /// Records for the given codes. Codes without a record are simply absent
    /// from the result.
    async fn find_by_codes(&self, codes: &BTreeSet<Sku>) -> Result<Vec<StockRecord>, StockStoreError>;

    /// Insert or replace the record for its code.
    async fn upsert(&self, record: StockRecord) -> Result<(), StockStoreError>;
}

#[async_trait::async_trait]
impl<S> StockStore for Arc<S>
where
    S: StockStore + ?Sized,
{
    async fn find_by_codes(&self, codes: &BTreeSet<Sku>) -> Result<Vec<StockRecord>, StockStoreError> {
        (**self).find_by_codes(codes).await
    }

    async fn upsert(&self, record: StockRecord) -> Result<(), StockStoreError> {
        (**self).upsert(record).await
    }
}
