use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use microshop_orders::OrderRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/api/order", post(place_order))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// `POST /api/order`: stock check, persist, publish.
pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text());
        }
    };

    match services.place_order(&request).await {
        Ok(order_id) => (StatusCode::CREATED, Json(dto::OrderPlacedResponse::new(order_id))).into_response(),
        Err(e) => errors::place_order_error_to_response(e),
    }
}
