//! Order persistence.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use microshop_orders::Order;

pub use in_memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderStoreError {
    /// An order with the same id already exists.
    #[error("order {0} already exists")]
    Duplicate(String),
    /// The backing store could not be reached.
    #[error("order store unavailable: {0}")]
    Unavailable(String),
    /// Any other write failure.
    #[error("order store write failed: {0}")]
    Write(String),
}

/// Write side of the order store. Orders are saved once and never updated.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn save(&self, order: &Order) -> Result<(), OrderStoreError>;
}

#[async_trait::async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn save(&self, order: &Order) -> Result<(), OrderStoreError> {
        (**self).save(order).await
    }
}
