//! Order domain module.
//!
//! Mapping of incoming order requests, the order value itself, the stock
//! requirement every order must satisfy, and the event announcing a placed
//! order. Pure logic; the placement workflow lives in `microshop-infra`.

pub mod order;

pub use order::{
    LineItem, LineItemRequest, Order, OrderPlacedEvent, OrderRequest, unavailable_codes,
};
