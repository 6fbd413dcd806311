use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use microshop_infra::{StockQueryError, StockStoreError};

pub fn stock_query_error_to_response(err: StockQueryError) -> axum::response::Response {
    match err {
        StockQueryError::NoCodes => json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string()),
        StockQueryError::Store(StockStoreError::Unavailable(msg)) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
        StockQueryError::Store(StockStoreError::Query(msg)) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
