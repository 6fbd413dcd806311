//! HTTP application wiring for the Order Placement Orchestrator.
//!
//! - `services.rs`: inventory client, order store and publisher wiring
//! - `routes.rs`: handlers
//! - `dto.rs`: response bodies
//! - `errors.rs`: placement error to HTTP mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around already-wired services.
pub fn build_app(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services))))
}
