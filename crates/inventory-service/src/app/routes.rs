use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use microshop_inventory::AvailabilityResult;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/api/inventory", get(query_availability))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `GET /api/inventory?skuCode=..`: one availability entry per distinct code.
pub async fn query_availability(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let codes = match dto::sku_codes_from_query(&params) {
        Ok(codes) => codes,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
    };

    match services.stock().query_availability(&codes).await {
        Ok(availability) => {
            let body: Vec<AvailabilityResult> = availability.into_values().collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(codes = codes.len(), error = %e, "availability query failed");
            errors::stock_query_error_to_response(e)
        }
    }
}
