use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use microshop_core::{DomainError, DomainResult, Sku, ValueObject};

/// Per-code availability keyed by product code.
pub type AvailabilityMap = BTreeMap<Sku, AvailabilityResult>;

/// Current on-hand quantity for one product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    sku: Sku,
    quantity_on_hand: i64,
}

impl StockRecord {
    pub fn new(sku: Sku, quantity_on_hand: i64) -> DomainResult<Self> {
        if quantity_on_hand < 0 {
            return Err(DomainError::invariant(format!(
                "stock for {sku} cannot be negative ({quantity_on_hand})"
            )));
        }
        Ok(Self {
            sku,
            quantity_on_hand,
        })
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn quantity_on_hand(&self) -> i64 {
        self.quantity_on_hand
    }

    /// Available means strictly positive on-hand quantity.
    pub fn is_in_stock(&self) -> bool {
        self.quantity_on_hand > 0
    }
}

/// Availability of one product code at query time (derived, never stored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    #[serde(rename = "skuCode")]
    pub sku: Sku,
    #[serde(rename = "isInStock")]
    pub in_stock: bool,
}

impl ValueObject for AvailabilityResult {}

/// Derive availability for every requested code from the records a store
/// returned.
///
/// Codes the store knows nothing about are reported as not in stock. Records
/// for codes that were not requested are ignored.
pub fn evaluate_availability(requested: &BTreeSet<Sku>, records: &[StockRecord]) -> AvailabilityMap {
    let by_code: HashMap<&Sku, &StockRecord> = records.iter().map(|r| (r.sku(), r)).collect();

    requested
        .iter()
        .map(|sku| {
            let in_stock = by_code.get(sku).is_some_and(|r| r.is_in_stock());
            (
                sku.clone(),
                AvailabilityResult {
                    sku: sku.clone(),
                    in_stock,
                },
            )
        })
        .collect()
}

/// Parse a `code=qty,code=qty` seed string into stock records.
///
/// Blank input yields no records. A code listed twice keeps the last quantity.
pub fn parse_stock_seed(raw: &str) -> DomainResult<Vec<StockRecord>> {
    let mut records: BTreeMap<Sku, StockRecord> = BTreeMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (code, qty) = entry
            .split_once('=')
            .ok_or_else(|| DomainError::validation(format!("seed entry '{entry}' must be code=qty")))?;
        let sku = Sku::parse(code)?;
        let qty: i64 = qty
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("seed quantity for '{sku}' is not an integer")))?;
        records.insert(sku.clone(), StockRecord::new(sku, qty)?);
    }

    Ok(records.into_values().collect())
}
