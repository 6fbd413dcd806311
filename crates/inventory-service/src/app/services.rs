use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::PgPool;

use microshop_infra::{InMemoryStockStore, PostgresStockStore, StockQueryService, StockStore};
use microshop_inventory::parse_stock_seed;

use crate::config::Config;

pub type DynStockStore = Arc<dyn StockStore>;

pub struct AppServices {
    stock: StockQueryService<DynStockStore>,
}

impl AppServices {
    pub fn new(store: DynStockStore, lookup_delay: Duration) -> Self {
        Self {
            stock: StockQueryService::new(store).with_lookup_delay(lookup_delay),
        }
    }

    pub fn stock(&self) -> &StockQueryService<DynStockStore> {
        &self.stock
    }
}

/// Pick the store (Postgres when a database URL is configured, in-memory
/// otherwise), apply the seed and wrap it in the query service.
pub async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    let store: DynStockStore = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresStockStore::new(pool);
            store.ensure_schema().await?;
            tracing::info!("using Postgres stock store");
            Arc::new(store)
        }
        None => {
            tracing::info!("using in-memory stock store");
            Arc::new(InMemoryStockStore::new())
        }
    };

    let seed = parse_stock_seed(&config.seed).context("invalid INVENTORY_SEED")?;
    let seeded = seed.len();
    for record in seed {
        store.upsert(record).await?;
    }
    if seeded > 0 {
        tracing::info!(records = seeded, "stock seeded");
    }

    Ok(AppServices::new(store, config.lookup_delay))
}
