//! Order placement workflow (application-level orchestration).
//!
//! ```text
//! OrderRequest
//!   ↓
//! 1. Map line items (pure, rejects malformed input)
//!   ↓
//! 2. Collect distinct product codes
//!   ↓
//! 3. Ask the Stock Query Service (remote, blocking, bounded by the client timeout)
//!   ↓
//! 4. Require every code reported and in stock
//!   ↓
//! 5. Persist the order
//!   ↓
//! 6. Publish OrderPlacedEvent
//! ```
//!
//! Side effects happen only after step 4 passes, always persist-then-publish.
//! The two are not atomic: a crash between 5 and 6 leaves a stored order with
//! no event. A publish failure after a successful save is returned as
//! [`PlaceOrderError::Publish`] carrying the order id, so the missing
//! notification is visible to the caller and the logs.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value as JsonValue;
use thiserror::Error;

use microshop_core::{DomainError, OrderId, Sku};
use microshop_events::{EventEnvelope, Publisher};
use microshop_inventory::AvailabilityResult;
use microshop_observability::{CallOutcome, OutboundCall, OutboundCallHook, TracingCallHook};
use microshop_orders::{Order, OrderPlacedEvent, OrderRequest, unavailable_codes};

use crate::inventory_client::{InventoryClient, InventoryClientError};
use crate::order_store::{OrderStore, OrderStoreError};

/// Topic order notifications go to unless configured otherwise.
pub const DEFAULT_NOTIFICATION_TOPIC: &str = "notificationTopic";

const INVENTORY_LOOKUP: OutboundCall<'static> = OutboundCall {
    name: "inventory_service_lookup",
    peer: "inventory-service",
};

#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// The request itself is malformed.
    #[error("invalid order request: {0}")]
    Validation(String),
    /// At least one requested product is unavailable or unknown.
    #[error("Product is not in stock, please try again later")]
    OutOfStock(Vec<Sku>),
    /// The Stock Query Service could not answer.
    #[error("inventory service unavailable: {0}")]
    UpstreamUnavailable(#[from] InventoryClientError),
    /// The order could not be persisted; nothing was published.
    #[error("order could not be saved: {0}")]
    Store(#[from] OrderStoreError),
    /// The order was saved but its event could not be handed to the publisher.
    #[error("order {order_id} saved but its notification was not published: {reason}")]
    Publish { order_id: OrderId, reason: String },
}

impl From<DomainError> for PlaceOrderError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => PlaceOrderError::Validation(msg),
        }
    }
}

/// Places orders against a remote stock check.
///
/// ## Generic Parameters
///
/// - `C`: client for the Stock Query Service
/// - `S`: order store
/// - `P`: event publisher (JSON envelopes)
///
/// Every collaborator is passed in explicitly; in-memory implementations make
/// the whole workflow testable without a network or database.
pub struct OrderPlacement<C, S, P> {
    inventory: C,
    orders: S,
    publisher: P,
    topic: String,
    hook: Arc<dyn OutboundCallHook>,
}

impl<C, S, P> OrderPlacement<C, S, P> {
    pub fn new(inventory: C, orders: S, publisher: P) -> Self {
        Self {
            inventory,
            orders,
            publisher,
            topic: DEFAULT_NOTIFICATION_TOPIC.to_string(),
            hook: Arc::new(TracingCallHook),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Replace the instrumentation invoked around the stock lookup.
    pub fn with_hook(mut self, hook: Arc<dyn OutboundCallHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn orders(&self) -> &S {
        &self.orders
    }
}

impl<C, S, P> OrderPlacement<C, S, P>
where
    C: InventoryClient,
    S: OrderStore,
    P: Publisher<EventEnvelope<JsonValue>>,
{
    /// Place an order: stock check, then persist, then publish.
    ///
    /// Returns the new order id. On any error nothing is persisted, except for
    /// [`PlaceOrderError::Publish`] where the order is stored but unannounced.
    pub async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, PlaceOrderError> {
        let line_items = request.to_line_items()?;
        let codes: BTreeSet<Sku> = line_items.iter().map(|l| l.sku().clone()).collect();

        let results = self.lookup(&codes).await?;

        let missing = unavailable_codes(&codes, &results);
        if !missing.is_empty() {
            tracing::info!(
                requested = codes.len(),
                unavailable = ?missing.iter().map(Sku::as_str).collect::<Vec<_>>(),
                "order rejected: products not in stock"
            );
            return Err(PlaceOrderError::OutOfStock(missing));
        }

        let order = Order::new(OrderId::new(), line_items)?;
        let order_id = order.id();

        self.orders.save(&order).await.map_err(|e| {
            tracing::error!(%order_id, error = %e, "order save failed");
            e
        })?;

        self.announce(order_id)?;

        tracing::info!(
            %order_id,
            lines = order.line_items().len(),
            total = %order.total(),
            "order placed"
        );
        Ok(order_id)
    }

    async fn lookup(
        &self,
        codes: &BTreeSet<Sku>,
    ) -> Result<Vec<AvailabilityResult>, PlaceOrderError> {
        self.hook.on_start(INVENTORY_LOOKUP);
        let started = Instant::now();

        let result = self.inventory.query_availability(codes).await;

        match &result {
            Ok(_) => self
                .hook
                .on_finish(INVENTORY_LOOKUP, started.elapsed(), CallOutcome::Succeeded),
            Err(e) => {
                let reason = e.to_string();
                self.hook
                    .on_finish(INVENTORY_LOOKUP, started.elapsed(), CallOutcome::Failed(&reason));
            }
        }

        Ok(result?)
    }

    fn announce(&self, order_id: OrderId) -> Result<(), PlaceOrderError> {
        let publish_failed = |reason: String| {
            tracing::error!(%order_id, topic = %self.topic, %reason, "order saved but not announced");
            PlaceOrderError::Publish { order_id, reason }
        };

        let envelope = EventEnvelope::wrap(OrderPlacedEvent { order_id })
            .into_json()
            .map_err(|e| publish_failed(e.to_string()))?;

        self.publisher
            .publish(&self.topic, envelope)
            .map_err(|e| publish_failed(e.to_string()))
    }
}
