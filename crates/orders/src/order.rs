use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use microshop_core::{DomainError, DomainResult, OrderId, Sku, ValueObject};
use microshop_events::Event;
use microshop_inventory::AvailabilityResult;

/// Incoming line item, as the HTTP surface receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub sku_code: String,
    pub price: Decimal,
    pub quantity: i64,
}

/// Incoming order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "orderLineItemsDtoList", alias = "lineItems")]
    pub line_items: Vec<LineItemRequest>,
}

impl OrderRequest {
    pub fn new(line_items: Vec<LineItemRequest>) -> Self {
        Self { line_items }
    }

    /// Map every requested line into the internal representation, preserving
    /// request order. Fails on the first invalid line.
    pub fn to_line_items(&self) -> DomainResult<Vec<LineItem>> {
        if self.line_items.is_empty() {
            return Err(DomainError::validation("order must contain at least one line item"));
        }

        let items = self
            .line_items
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                Sku::parse(&line.sku_code)
                    .and_then(|sku| LineItem::new(sku, line.quantity, line.price))
                    .map_err(|e| match e {
                        DomainError::Validation(msg) => {
                            DomainError::validation(format!("line {}: {msg}", idx + 1))
                        }
                        other => other,
                    })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        if checked_total(&items).is_none() {
            return Err(DomainError::validation("order total is too large"));
        }
        Ok(items)
    }
}

/// Fractional digits a unit price may carry (stored as `NUMERIC(19, 2)`).
pub const PRICE_SCALE: u32 = 2;
/// Integer digits a unit price may carry.
pub const PRICE_INTEGER_DIGITS: u32 = 17;

fn max_price() -> Decimal {
    Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS))
}

fn checked_total(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// One requested quantity of a product at a given unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    sku: Sku,
    quantity: i64,
    price: Decimal,
}

impl LineItem {
    pub fn new(sku: Sku, quantity: i64, price: Decimal) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if price.is_sign_negative() && !price.is_zero() {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if price.normalize().scale() > PRICE_SCALE {
            return Err(DomainError::validation(format!(
                "price cannot have more than {PRICE_SCALE} decimal places"
            )));
        }
        if price >= max_price() {
            return Err(DomainError::validation(format!(
                "price must be below 10^{PRICE_INTEGER_DIGITS}"
            )));
        }
        Ok(Self { sku, quantity, price })
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// `None` when price × quantity does not fit a `Decimal`.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

impl ValueObject for LineItem {}

/// A placed order. Built once per placement attempt and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    line_items: Vec<LineItem>,
    total: Decimal,
}

impl Order {
    pub fn new(id: OrderId, line_items: Vec<LineItem>) -> DomainResult<Self> {
        if line_items.is_empty() {
            return Err(DomainError::invariant("order must contain at least one line item"));
        }
        let total = checked_total(&line_items)
            .ok_or_else(|| DomainError::invariant("order total overflows"))?;
        Ok(Self { id, line_items, total })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// Event: an order was persisted and downstream systems may notify on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedEvent {
    #[serde(rename = "orderNumber")]
    pub order_id: OrderId,
}

impl Event for OrderPlacedEvent {
    fn event_type(&self) -> &'static str {
        "order.placed"
    }

    fn version(&self) -> u32 {
        1
    }
}

/// Codes that fail the "everything in stock" requirement.
///
/// A code fails when any returned result for it says `in_stock = false`, or
/// when the stock service returned nothing for it at all. An empty return
/// value means the order may proceed.
pub fn unavailable_codes(requested: &BTreeSet<Sku>, results: &[AvailabilityResult]) -> Vec<Sku> {
    requested
        .iter()
        .filter(|sku| {
            let mut seen = results.iter().filter(|r| &r.sku == *sku).peekable();
            seen.peek().is_none() || seen.any(|r| !r.in_stock)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn line(code: &str, quantity: i64, price: &str) -> LineItemRequest {
        LineItemRequest {
            sku_code: code.to_string(),
            price: price.parse().unwrap(),
            quantity,
        }
    }

    fn available(code: &str, in_stock: bool) -> AvailabilityResult {
        AvailabilityResult {
            sku: sku(code),
            in_stock,
        }
    }

    #[test]
    fn request_maps_lines_in_order() {
        let req = OrderRequest::new(vec![line("B", 1, "2.50"), line("A", 3, "10")]);
        let items = req.to_line_items().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku(), &sku("B"));
        assert_eq!(items[1].quantity(), 3);
        assert_eq!(items[1].price(), Decimal::new(10, 0));
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = OrderRequest::new(vec![]).to_line_items().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn invalid_line_reports_its_position() {
        let req = OrderRequest::new(vec![line("A", 1, "1"), line("B", -2, "1")]);
        match req.to_line_items().unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.starts_with("line 2:"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_code_and_negative_price_are_rejected() {
        assert!(OrderRequest::new(vec![line(" ", 1, "1")]).to_line_items().is_err());
        assert!(OrderRequest::new(vec![line("A", 1, "-0.01")]).to_line_items().is_err());
        assert!(OrderRequest::new(vec![line("A", 0, "0")]).to_line_items().is_ok());
    }

    #[test]
    fn request_deserializes_from_wire_shape() {
        let req: OrderRequest = serde_json::from_value(serde_json::json!({
            "orderLineItemsDtoList": [
                {"skuCode": "iphone_13", "price": "1200", "quantity": 1}
            ]
        }))
        .unwrap();
        assert_eq!(req.line_items[0].sku_code, "iphone_13");
        assert_eq!(req.line_items[0].price, Decimal::new(1200, 0));
    }

    #[test]
    fn order_sums_line_totals() {
        let items = OrderRequest::new(vec![
            line("A", 2, "1.25"),
            line("B", 1, "3"),
            line("A", 1, "1.25"),
        ])
        .to_line_items()
        .unwrap();
        let order = Order::new(OrderId::new(), items).unwrap();

        assert_eq!(order.total(), Decimal::new(675, 2));
    }

    #[test]
    fn price_must_fit_two_decimal_places() {
        let err = OrderRequest::new(vec![line("A", 1, "0.005")]).to_line_items().unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("decimal places")), "{err:?}");

        // Trailing zeros do not count as precision.
        assert!(OrderRequest::new(vec![line("A", 1, "0.500")]).to_line_items().is_ok());
    }

    #[test]
    fn price_must_fit_the_stored_magnitude() {
        assert!(OrderRequest::new(vec![line("A", 1, "99999999999999999.99")]).to_line_items().is_ok());
        assert!(OrderRequest::new(vec![line("A", 1, "100000000000000000")]).to_line_items().is_err());
    }

    #[test]
    fn overflowing_total_is_rejected_up_front() {
        let huge = line("A", i64::MAX, "99999999999999999");
        let err = OrderRequest::new(vec![huge]).to_line_items().unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("too large")), "{err:?}");

        let item = LineItem::new(sku("A"), i64::MAX, Decimal::new(99_999_999_999_999_999, 0)).unwrap();
        assert!(item.line_total().is_none());
        assert!(matches!(
            Order::new(OrderId::new(), vec![item]),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn order_without_lines_violates_invariant() {
        assert!(matches!(
            Order::new(OrderId::new(), vec![]),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn placed_event_uses_order_number_on_the_wire() {
        let id = OrderId::new();
        let json = serde_json::to_value(OrderPlacedEvent { order_id: id }).unwrap();
        assert_eq!(json, serde_json::json!({"orderNumber": id.to_string()}));
        assert_eq!(OrderPlacedEvent { order_id: id }.event_type(), "order.placed");
    }

    #[test]
    fn all_in_stock_passes() {
        let requested = [sku("A"), sku("B")].into_iter().collect();
        let results = vec![available("A", true), available("B", true)];
        assert!(unavailable_codes(&requested, &results).is_empty());
    }

    #[test]
    fn out_of_stock_code_fails() {
        let requested = [sku("A"), sku("B")].into_iter().collect();
        let results = vec![available("A", true), available("B", false)];
        assert_eq!(unavailable_codes(&requested, &results), vec![sku("B")]);
    }

    #[test]
    fn missing_code_fails() {
        let requested = [sku("A"), sku("B")].into_iter().collect();
        let results = vec![available("A", true)];
        assert_eq!(unavailable_codes(&requested, &results), vec![sku("B")]);
    }

    #[test]
    fn conflicting_duplicates_count_as_unavailable() {
        let requested = [sku("A")].into_iter().collect();
        let results = vec![available("A", true), available("A", false)];
        assert_eq!(unavailable_codes(&requested, &results), vec![sku("A")]);
    }

    proptest! {
        /// Property: the requirement passes iff every requested code is
        /// reported and every report says in stock.
        #[test]
        fn requirement_matches_all_in_stock(
            flags in proptest::collection::btree_map("[a-z]{1,4}", proptest::option::of(any::<bool>()), 1..8)
        ) {
            let requested: BTreeSet<Sku> = flags.keys().map(|c| sku(c)).collect();
            let results: Vec<AvailabilityResult> = flags
                .iter()
                .filter_map(|(c, f)| f.map(|in_stock| available(c, in_stock)))
                .collect();

            let expected_ok = flags.values().all(|f| *f == Some(true));
            prop_assert_eq!(unavailable_codes(&requested, &results).is_empty(), expected_ok);
        }
    }
}
