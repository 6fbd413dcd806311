//! Stock Query Service: per-code availability from the stock store.

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use microshop_core::Sku;
use microshop_inventory::{AvailabilityMap, evaluate_availability};

use crate::stock_store::{StockStore, StockStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockQueryError {
    #[error("at least one product code is required")]
    NoCodes,
    #[error(transparent)]
    Store(#[from] StockStoreError),
}

/// Read-only availability lookup over a [`StockStore`].
#[derive(Debug)]
pub struct StockQueryService<S> {
    store: S,
    lookup_delay: Duration,
}

impl<S> StockQueryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lookup_delay: Duration::ZERO,
        }
    }

    /// Artificially slow every lookup down (simulates a sluggish dependency).
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }
}

impl<S: StockStore> StockQueryService<S> {
    /// Availability for every requested code; unknown codes are not in stock.
    ///
    /// Never fabricates an answer: a store failure is returned as an error.
    pub async fn query_availability(&self, codes: &BTreeSet<Sku>) -> Result<AvailabilityMap, StockQueryError> {
        if codes.is_empty() {
            return Err(StockQueryError::NoCodes);
        }

        if !self.lookup_delay.is_zero() {
            tracing::info!(delay_ms = self.lookup_delay.as_millis() as u64, "lookup delay started");
            tokio::time::sleep(self.lookup_delay).await;
            tracing::info!("lookup delay ended");
        }

        let records = self.store.find_by_codes(codes).await.map_err(|e| {
            tracing::error!(error = %e, "stock lookup failed");
            e
        })?;
        let availability = evaluate_availability(codes, &records);

        tracing::debug!(
            requested = codes.len(),
            in_stock = availability.values().filter(|a| a.in_stock).count(),
            "stock availability evaluated"
        );
        Ok(availability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock_store::InMemoryStockStore;
    use microshop_inventory::StockRecord;
    use proptest::prelude::*;

    struct DownStore;

    #[async_trait::async_trait]
    impl StockStore for DownStore {
        async fn find_by_codes(&self, _codes: &BTreeSet<Sku>) -> Result<Vec<StockRecord>, StockStoreError> {
            Err(StockStoreError::Unavailable("connection refused".into()))
        }

        async fn upsert(&self, _record: StockRecord) -> Result<(), StockStoreError> {
            Err(StockStoreError::Unavailable("connection refused".into()))
        }
    }

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn codes(list: &[&str]) -> BTreeSet<Sku> {
        list.iter().map(|s| sku(s)).collect()
    }

    fn service(stock: &[(&str, i64)]) -> StockQueryService<InMemoryStockStore> {
        StockQueryService::new(InMemoryStockStore::with_records(
            stock.iter().map(|(c, q)| StockRecord::new(sku(c), *q).unwrap()),
        ))
    }

    #[tokio::test]
    async fn reports_availability_per_code() {
        let svc = service(&[("A", 5), ("B", 0)]);
        let result = svc.query_availability(&codes(&["A", "B"])).await.unwrap();

        assert!(result[&sku("A")].in_stock);
        assert!(!result[&sku("B")].in_stock);
    }

    #[tokio::test]
    async fn absent_code_is_not_in_stock() {
        let svc = service(&[("A", 5)]);
        let result = svc.query_availability(&codes(&["X"])).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(!result[&sku("X")].in_stock);
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let svc = service(&[("A", 5)]);
        let err = svc.query_availability(&BTreeSet::new()).await.unwrap_err();
        assert_eq!(err, StockQueryError::NoCodes);
    }

    #[tokio::test]
    async fn store_outage_is_surfaced_not_guessed() {
        let svc = StockQueryService::new(DownStore);
        let err = svc.query_availability(&codes(&["A"])).await.unwrap_err();
        assert!(matches!(err, StockQueryError::Store(StockStoreError::Unavailable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_delay_is_applied() {
        let svc = service(&[("A", 1)]).with_lookup_delay(Duration::from_secs(10));
        let started = tokio::time::Instant::now();

        svc.query_availability(&codes(&["A"])).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    proptest! {
        /// Property: repeated queries against unchanged stock agree.
        #[test]
        fn repeated_queries_agree(
            stock in proptest::collection::btree_map("[A-Z]{1,2}", 0i64..3, 0..6),
            asked in proptest::collection::btree_set("[A-Z]{1,2}", 1..6),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let entries: Vec<(&str, i64)> = stock.iter().map(|(c, q)| (c.as_str(), *q)).collect();
            let svc = service(&entries);
            let requested: BTreeSet<Sku> = asked.iter().map(|c| sku(c)).collect();

            let first = rt.block_on(svc.query_availability(&requested)).unwrap();
            let second = rt.block_on(svc.query_availability(&requested)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
