use std::sync::RwLock;

use microshop_core::OrderId;
use microshop_orders::Order;

use super::{OrderStore, OrderStoreError};

/// In-memory order store for tests/dev. Keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        let orders = self.orders.read().ok()?;
        orders.iter().find(|o| o.id() == id).cloned()
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.read().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, order: &Order) -> Result<(), OrderStoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderStoreError::Unavailable("lock poisoned".into()))?;

        if orders.iter().any(|o| o.id() == order.id()) {
            return Err(OrderStoreError::Duplicate(order.id().to_string()));
        }
        orders.push(order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microshop_core::Sku;
    use microshop_orders::LineItem;
    use rust_decimal::Decimal;

    fn order(id: OrderId) -> Order {
        let item = LineItem::new(Sku::parse("A").unwrap(), 1, Decimal::ONE).unwrap();
        Order::new(id, vec![item]).unwrap()
    }

    #[tokio::test]
    async fn saves_and_reads_back() {
        let store = InMemoryOrderStore::new();
        let id = OrderId::new();
        store.save(&order(id)).await.unwrap();

        assert_eq!(store.get(id), Some(order(id)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = InMemoryOrderStore::new();
        let id = OrderId::new();
        store.save(&order(id)).await.unwrap();

        let err = store.save(&order(id)).await.unwrap_err();
        assert_eq!(err, OrderStoreError::Duplicate(id.to_string()));
        assert_eq!(store.len(), 1);
    }
}
