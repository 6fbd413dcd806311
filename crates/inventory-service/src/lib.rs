//! Stock Query Service: HTTP surface over stock availability.

pub mod app;
pub mod config;
