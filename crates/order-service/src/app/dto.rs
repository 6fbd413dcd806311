use serde::Serialize;

use microshop_core::OrderId;

pub const ORDER_SAVED_MESSAGE: &str = "Order save success";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub order_number: OrderId,
    pub message: &'static str,
}

impl OrderPlacedResponse {
    pub fn new(order_number: OrderId) -> Self {
        Self {
            order_number,
            message: ORDER_SAVED_MESSAGE,
        }
    }
}
