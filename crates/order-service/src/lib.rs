//! Order Placement Orchestrator: HTTP surface over order placement.

pub mod app;
pub mod config;
