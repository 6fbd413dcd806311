use std::sync::Arc;

use anyhow::Context;
use serde_json::Value as JsonValue;
#[cfg(feature = "redis")]
use sqlx::PgPool;

use microshop_core::OrderId;
use microshop_events::{EventEnvelope, InMemoryEventBus};
#[cfg(feature = "redis")]
use microshop_infra::event_bus::{DEFAULT_REDIS_TIMEOUT, RedisPubSubPublisher};
#[cfg(feature = "redis")]
use microshop_infra::PostgresOrderStore;
use microshop_infra::{
    HttpInventoryClient, InMemoryOrderStore, OrderPlacement, OrderStore, PlaceOrderError,
};
use microshop_orders::OrderRequest;

use crate::config::Config;

pub type JsonEnvelope = EventEnvelope<JsonValue>;
pub type DynOrderStore = Arc<dyn OrderStore>;

type InMemoryPlacement =
    OrderPlacement<Arc<HttpInventoryClient>, DynOrderStore, Arc<InMemoryEventBus<JsonEnvelope>>>;

#[cfg(feature = "redis")]
type RedisPlacement = OrderPlacement<Arc<HttpInventoryClient>, DynOrderStore, Arc<RedisPubSubPublisher>>;

/// Placement wiring, one variant per publisher transport.
pub enum AppServices {
    InMemory {
        placement: InMemoryPlacement,
    },
    #[cfg(feature = "redis")]
    Redis {
        placement: RedisPlacement,
    },
}

impl AppServices {
    /// In-process wiring; callers keep their own handles on `orders` and
    /// `bus` to observe what a placement did.
    pub fn in_memory(
        inventory: HttpInventoryClient,
        orders: DynOrderStore,
        bus: Arc<InMemoryEventBus<JsonEnvelope>>,
        topic: impl Into<String>,
    ) -> Self {
        AppServices::InMemory {
            placement: OrderPlacement::new(Arc::new(inventory), orders, bus).with_topic(topic),
        }
    }

    pub async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, PlaceOrderError> {
        match self {
            AppServices::InMemory { placement } => placement.place_order(request).await,
            #[cfg(feature = "redis")]
            AppServices::Redis { placement } => placement.place_order(request).await,
        }
    }
}

pub async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    let inventory = HttpInventoryClient::new(&config.inventory_url, config.inventory_timeout)
        .context("failed to build inventory client")?;

    let Some(database_url) = &config.database_url else {
        tracing::info!("using in-memory order store and event bus");
        return Ok(AppServices::in_memory(
            inventory,
            Arc::new(InMemoryOrderStore::new()),
            Arc::new(InMemoryEventBus::new()),
            config.topic.clone(),
        ));
    };

    #[cfg(not(feature = "redis"))]
    {
        let _ = (database_url, inventory);
        anyhow::bail!("{}", crate::config::PERSISTENT_NEEDS_REDIS)
    }

    #[cfg(feature = "redis")]
    {
        let pool = PgPool::connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        let store = PostgresOrderStore::new(pool);
        store.ensure_schema().await?;
        let orders: DynOrderStore = Arc::new(store);

        let bus = RedisPubSubPublisher::new(&config.redis_url, DEFAULT_REDIS_TIMEOUT)
            .context("failed to open Redis client")?;
        tracing::info!("using Postgres order store and Redis pub/sub");
        Ok(AppServices::Redis {
            placement: OrderPlacement::new(Arc::new(inventory), orders, Arc::new(bus))
                .with_topic(config.topic.clone()),
        })
    }
}
