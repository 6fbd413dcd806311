//! HTTP application wiring for the Stock Query Service.
//!
//! - `services.rs`: store selection, seeding and the query service
//! - `routes.rs`: handlers
//! - `dto.rs`: query-string parsing
//! - `errors.rs`: JSON error responses

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
