//! Inventory domain module.
//!
//! Business rules for stock availability, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod stock;

pub use stock::{
    AvailabilityMap, AvailabilityResult, StockRecord, evaluate_availability, parse_stock_seed,
};
