//! Reduction of classified items into named subtotals.

use crate::core::{ClassifiedLineItem, SubtotalGroup};

/// Fold a batch of classified items into a named subtotal group.
///
/// Single pass; both sums are exact under `Decimal` and independent of
/// input order, so batches may be aggregated in parallel and merged.
pub fn aggregate<'a>(
    items: impl IntoIterator<Item = &'a ClassifiedLineItem>,
    group_id: impl Into<String>,
) -> SubtotalGroup {
    let mut group = SubtotalGroup::new(group_id);
    for item in items {
        group.add(item);
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LineItem, classify};
    use rust_decimal_macros::dec;

    fn classified(cfop: &str, value: &str) -> ClassifiedLineItem {
        classify(LineItem {
            source_document_id: "42".into(),
            issue_date: None,
            description: "Sandália".into(),
            ncm_code: "64022000".into(),
            cfop_code: cfop.into(),
            tax_regime_code: "500".into(),
            value: value.parse().unwrap(),
        })
    }

    #[test]
    fn both_sums_in_one_pass() {
        let items = [
            classified("5405", "1500.00"),
            classified("5102", "2000.00"),
        ];
        let group = aggregate(&items, "xml-batch");
        assert_eq!(group.tax_substitution_total, dec!(1500.00));
        assert_eq!(group.grand_total, dec!(3500.00));
        assert_eq!(group.item_count, 2);
    }

    #[test]
    fn merge_adds_field_wise() {
        let a = aggregate(&[classified("5405", "100")], "a");
        let b = aggregate(&[classified("6403", "50"), classified("5102", "7")], "b");
        let merged = a.merge(&b);
        assert_eq!(merged.group_id, "a+b");
        assert_eq!(merged.tax_substitution_total, dec!(150));
        assert_eq!(merged.grand_total, dec!(157));
        assert_eq!(merged.item_count, 3);
    }

    #[test]
    fn empty_batch_is_zero() {
        let group = aggregate(std::iter::empty::<&ClassifiedLineItem>(), "vazio");
        assert_eq!(group.grand_total, dec!(0));
        assert_eq!(group.item_count, 0);
    }
}
