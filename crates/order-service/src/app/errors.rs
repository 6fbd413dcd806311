use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use microshop_infra::PlaceOrderError;

pub fn place_order_error_to_response(err: PlaceOrderError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        PlaceOrderError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        PlaceOrderError::OutOfStock(codes) => {
            let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
            (
                StatusCode::CONFLICT,
                axum::Json(json!({
                    "error": "out_of_stock",
                    "message": message,
                    "skuCodes": codes,
                })),
            )
                .into_response()
        }
        PlaceOrderError::UpstreamUnavailable(_) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable", message)
        }
        PlaceOrderError::Store(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message),
        PlaceOrderError::Publish { order_id, reason } => (
            StatusCode::BAD_GATEWAY,
            axum::Json(json!({
                "error": "publish_error",
                "message": reason,
                "orderNumber": order_id,
            })),
        )
            .into_response(),
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
