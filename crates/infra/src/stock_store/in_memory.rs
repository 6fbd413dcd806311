use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use microshop_core::Sku;
use microshop_inventory::StockRecord;

use super::{StockStore, StockStoreError};

/// In-memory stock store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    records: RwLock<HashMap<Sku, StockRecord>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = StockRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.sku().clone(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl StockStore for InMemoryStockStore {
    async fn find_by_codes(&self, codes: &BTreeSet<Sku>) -> Result<Vec<StockRecord>, StockStoreError> {
        let map = self
            .records
            .read()
            .map_err(|_| StockStoreError::Unavailable("lock poisoned".into()))?;

        Ok(codes.iter().filter_map(|c| map.get(c).cloned()).collect())
    }

    async fn upsert(&self, record: StockRecord) -> Result<(), StockStoreError> {
        let mut map = self
            .records
            .write()
            .map_err(|_| StockStoreError::Unavailable("lock poisoned".into()))?;
        map.insert(record.sku().clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    #[tokio::test]
    async fn finds_only_known_codes() {
        let store = InMemoryStockStore::with_records([StockRecord::new(sku("A"), 2).unwrap()]);
        let codes: BTreeSet<Sku> = [sku("A"), sku("B")].into_iter().collect();

        let found = store.find_by_codes(&codes).await.unwrap();
        assert_eq!(found, vec![StockRecord::new(sku("A"), 2).unwrap()]);
    }

    #[tokio::test]
    async fn upsert_replaces_quantity() {
        let store = InMemoryStockStore::new();
        store.upsert(StockRecord::new(sku("A"), 2).unwrap()).await.unwrap();
        store.upsert(StockRecord::new(sku("A"), 0).unwrap()).await.unwrap();

        let codes: BTreeSet<Sku> = [sku("A")].into_iter().collect();
        let found = store.find_by_codes(&codes).await.unwrap();
        assert_eq!(found[0].quantity_on_hand(), 0);
        assert_eq!(store.len(), 1);
    }
}
