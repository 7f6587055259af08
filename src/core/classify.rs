//! Fixed business rules for Simples Nacional footwear audits.
//!
//! All rules are stateless string tests: NCM chapter prefix, CFOP set
//! membership, and the declared-vs-expected CSOSN comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::{ClassifiedLineItem, LineItem};

/// NCM chapter prefix for footwear.
pub const FOOTWEAR_NCM_PREFIX: &str = "64";

/// CFOP codes under tax substitution (ICMS-ST) — the operations where
/// recoverable credit typically sits for a footwear manufacturer.
pub const ST_CFOP_CODES: [&str; 7] = ["5401", "5402", "5403", "5405", "6401", "6403", "6404"];

/// CSOSN "500" — ICMS already collected upstream by substitution; the
/// line must not be taxed again under the simplified regime.
pub const CSOSN_ST: &str = "500";

/// Sentinel for a source that carries no tax-regime code at all.
pub const REGIME_CODE_UNKNOWN: &str = "N/A";

/// Modeled average share of the ICMS component within the Simples
/// Nacional unified payment for industry.
pub const ICMS_SHARE_SIMPLES: Decimal = dec!(0.335);

/// Whether a CFOP code belongs to the tax-substitution set.
pub fn is_st_cfop(cfop: &str) -> bool {
    ST_CFOP_CODES.contains(&cfop)
}

/// Derive the classification flags for one line item.
///
/// Total and pure: upstream parsing guarantees `ncm_code` and
/// `cfop_code` are present, so no input is ambiguous here.
pub fn classify(item: LineItem) -> ClassifiedLineItem {
    let is_footwear = item.ncm_code.starts_with(FOOTWEAR_NCM_PREFIX);
    let is_tax_substitution = is_st_cfop(&item.cfop_code);
    let treatment_mismatch = is_tax_substitution && item.tax_regime_code != CSOSN_ST;
    ClassifiedLineItem {
        item,
        is_footwear,
        is_tax_substitution,
        treatment_mismatch,
    }
}

/// Classify a whole batch, preserving order.
pub fn classify_all(items: impl IntoIterator<Item = LineItem>) -> Vec<ClassifiedLineItem> {
    items.into_iter().map(classify).collect()
}
