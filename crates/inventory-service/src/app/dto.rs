use std::collections::BTreeSet;

use microshop_core::{DomainResult, Sku};

/// Query key carrying product codes.
pub const SKU_CODE_PARAM: &str = "skuCode";

/// Collect product codes from `skuCode` query parameters.
///
/// Accepts both repeated parameters (`?skuCode=a&skuCode=b`) and
/// comma-separated values (`?skuCode=a,b`). Other keys are ignored.
pub fn sku_codes_from_query(params: &[(String, String)]) -> DomainResult<BTreeSet<Sku>> {
    params
        .iter()
        .filter(|(key, _)| key == SKU_CODE_PARAM)
        .flat_map(|(_, value)| value.split(','))
        .filter(|code| !code.trim().is_empty())
        .map(Sku::parse)
        .collect()
}
