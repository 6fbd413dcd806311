//! Infrastructure layer: stores, the stock query service, the inventory HTTP
//! client, event publishing backends and the order placement workflow.

pub mod event_bus;
pub mod inventory_client;
pub mod order_placement;
pub mod order_store;
pub mod stock_query;
pub mod stock_store;

pub use inventory_client::{HttpInventoryClient, InventoryClient, InventoryClientError};
pub use order_placement::{DEFAULT_NOTIFICATION_TOPIC, OrderPlacement, PlaceOrderError};
pub use order_store::{InMemoryOrderStore, OrderStore, OrderStoreError, PostgresOrderStore};
pub use stock_query::{StockQueryError, StockQueryService};
pub use stock_store::{InMemoryStockStore, PostgresStockStore, StockStore, StockStoreError};
