//! Per-session subtotal state.
//!
//! One diagnostic session ingests several batches (XML notes, a
//! spreadsheet export) and later reconciles any of them — or a combined
//! view — against the declared base. The state lives in an explicit
//! [`Session`] the caller owns and threads by `&mut`; there is no
//! ambient global. Single writer, plain owned data.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::core::{ClassifiedLineItem, Finding, ReconcileError, SubtotalGroup, reconcile};

/// Running subtotals for one diagnostic session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    groups: BTreeMap<String, SubtotalGroup>,
    last_finding: Option<Finding>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a batch of classified items into the named group.
    ///
    /// Repeated ingests under the same id add up, so a group can be fed
    /// invoice by invoice.
    pub fn ingest(&mut self, group_id: &str, items: &[ClassifiedLineItem]) -> &SubtotalGroup {
        let group = self
            .groups
            .entry(group_id.to_string())
            .or_insert_with(|| SubtotalGroup::new(group_id));
        for item in items {
            group.add(item);
        }
        group
    }

    pub fn group(&self, group_id: &str) -> Option<&SubtotalGroup> {
        self.groups.get(group_id)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Merged view over several named groups, e.g. the conciliated
    /// XML + spreadsheet base. `None` if any id is unknown.
    pub fn combined(&self, group_ids: &[&str]) -> Option<SubtotalGroup> {
        let mut iter = group_ids.iter();
        let mut acc = self.groups.get(*iter.next()?)?.clone();
        for id in iter {
            acc = acc.merge(self.groups.get(*id)?);
        }
        Some(acc)
    }

    /// Reconcile one group's ST subtotal against the declared base and
    /// retain the finding.
    pub fn reconcile_group(
        &mut self,
        group_id: &str,
        declared_value: Decimal,
        effective_rate: Decimal,
    ) -> Result<&Finding, ReconcileError> {
        let base = self
            .groups
            .get(group_id)
            .ok_or_else(|| ReconcileError::UnknownGroup(group_id.to_string()))?
            .tax_substitution_total;
        self.store(reconcile(base, declared_value, effective_rate)?)
    }

    /// Reconcile the merged ST subtotal of several groups.
    pub fn reconcile_combined(
        &mut self,
        group_ids: &[&str],
        declared_value: Decimal,
        effective_rate: Decimal,
    ) -> Result<&Finding, ReconcileError> {
        let base = self
            .combined(group_ids)
            .ok_or_else(|| {
                let missing = group_ids
                    .iter()
                    .find(|id| !self.groups.contains_key(**id))
                    .copied()
                    .unwrap_or("");
                ReconcileError::UnknownGroup(missing.to_string())
            })?
            .tax_substitution_total;
        self.store(reconcile(base, declared_value, effective_rate)?)
    }

    /// The most recent reconciliation outcome, if any.
    pub fn last_finding(&self) -> Option<&Finding> {
        self.last_finding.as_ref()
    }

    fn store(&mut self, finding: Finding) -> Result<&Finding, ReconcileError> {
        Ok(self.last_finding.insert(finding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LineItem, classify};
    use rust_decimal_macros::dec;

    fn st_item(value: &str) -> ClassifiedLineItem {
        classify(LineItem {
            source_document_id: "7".into(),
            issue_date: None,
            description: "Bota".into(),
            ncm_code: "64059000".into(),
            cfop_code: "5405".into(),
            tax_regime_code: "500".into(),
            value: value.parse().unwrap(),
        })
    }

    #[test]
    fn repeated_ingest_accumulates() {
        let mut session = Session::new();
        session.ingest("xml-batch", &[st_item("100")]);
        let group = session.ingest("xml-batch", &[st_item("50")]);
        assert_eq!(group.tax_substitution_total, dec!(150));
        assert_eq!(group.item_count, 2);
    }

    #[test]
    fn combined_merges_named_groups() {
        let mut session = Session::new();
        session.ingest("xml-batch", &[st_item("100")]);
        session.ingest("planilha", &[st_item("40")]);
        let combined = session.combined(&["xml-batch", "planilha"]).unwrap();
        assert_eq!(combined.tax_substitution_total, dec!(140));
        assert!(session.combined(&["xml-batch", "nada"]).is_none());
    }

    #[test]
    fn reconcile_group_stores_finding() {
        let mut session = Session::new();
        session.ingest("xml-batch", &[st_item("10000")]);
        let finding = session
            .reconcile_group("xml-batch", dec!(7000), dec!(8.5))
            .unwrap();
        assert!(matches!(finding, Finding::Credit(_)));
        assert!(session.last_finding().is_some());
    }

    #[test]
    fn unknown_group_is_an_error() {
        let mut session = Session::new();
        assert!(matches!(
            session.reconcile_group("nada", dec!(0), dec!(1)),
            Err(ReconcileError::UnknownGroup(_))
        ));
    }
}
