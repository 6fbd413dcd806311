//! `microshop-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory and
//! order domains (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod sku;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::OrderId;
pub use sku::Sku;
pub use value_object::ValueObject;
