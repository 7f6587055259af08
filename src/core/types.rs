use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::LineError;

/// One taxable product entry within one source document.
///
/// Produced by the NF-e parser or the tabular importer; both sources
/// normalize into this shape before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Identifier of the invoice or row the item came from (e.g. nNF).
    pub source_document_id: String,
    /// Issue date of the source document. Spreadsheet-sourced rows
    /// usually have none.
    pub issue_date: Option<NaiveDate>,
    /// Free-text product label (xProd).
    pub description: String,
    /// NCM tariff classification code. The first two digits denote the
    /// product chapter ("64" = footwear).
    pub ncm_code: String,
    /// CFOP fiscal operation code (4 digits).
    pub cfop_code: String,
    /// Declared CSOSN tax-treatment code under Simples Nacional.
    /// [`REGIME_CODE_UNKNOWN`](crate::core::REGIME_CODE_UNKNOWN) when the
    /// source carries none — never an empty string.
    pub tax_regime_code: String,
    /// Monetary amount of the line (vProd). Non-negative.
    pub value: Decimal,
}

/// A [`LineItem`] plus derived classification flags.
///
/// The flags are pure functions of the item — see
/// [`classify`](crate::core::classify).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLineItem {
    pub item: LineItem,
    /// NCM chapter 64 — footwear.
    pub is_footwear: bool,
    /// CFOP belongs to the tax-substitution (ICMS-ST) set.
    pub is_tax_substitution: bool,
    /// ST item whose declared CSOSN is not "500": tax was collected
    /// upfront by substitution but the line is not declared as such.
    pub treatment_mismatch: bool,
}

/// One parsed NF-e document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number (ide/nNF).
    pub number: String,
    /// Issue date (ide/dhEmi truncated to calendar-date precision).
    pub issue_date: NaiveDate,
    /// Line items that parsed cleanly, in document order.
    pub items: Vec<LineItem>,
    /// Lines excluded from `items`, each with its reason. A rejected
    /// line never aborts the rest of the document.
    pub rejected_lines: Vec<LineError>,
}

/// A named accumulation of classified line items.
///
/// Created empty, fed additively batch by batch, and kept for the whole
/// session so reconciliation can reference any group by id later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtotalGroup {
    pub group_id: String,
    /// Sum of `value` over items flagged `is_tax_substitution`.
    pub tax_substitution_total: Decimal,
    /// Sum of `value` over all items.
    pub grand_total: Decimal,
    /// Number of items accumulated.
    pub item_count: usize,
}

impl SubtotalGroup {
    /// A fresh, empty group.
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            tax_substitution_total: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            item_count: 0,
        }
    }

    /// Accumulate one classified item.
    pub fn add(&mut self, item: &ClassifiedLineItem) {
        if item.is_tax_substitution {
            self.tax_substitution_total += item.item.value;
        }
        self.grand_total += item.item.value;
        self.item_count += 1;
    }

    /// Field-wise sum of two groups, under a combined id (`"a+b"`).
    ///
    /// Groups must be merged rather than recomputed: raw items from
    /// earlier batches may no longer be retained.
    pub fn merge(&self, other: &SubtotalGroup) -> SubtotalGroup {
        SubtotalGroup {
            group_id: format!("{}+{}", self.group_id, other.group_id),
            tax_substitution_total: self.tax_substitution_total + other.tax_substitution_total,
            grand_total: self.grand_total + other.grand_total,
            item_count: self.item_count + other.item_count,
        }
    }
}

/// Outcome of comparing a computed base against the declared figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finding {
    /// A recoverable credit was estimated.
    Credit(ReconciliationResult),
    /// Declared figures already match or exceed the computed base.
    /// A legitimate result, not an error.
    NoCredit {
        chosen_base: Decimal,
        declared_value: Decimal,
        /// `chosen_base - declared_value`, zero or negative here.
        difference: Decimal,
    },
}

/// The positive finding: a credit estimate over an undeclared base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// The subtotal used as the computed base.
    pub chosen_base: Decimal,
    /// The externally declared tax base.
    pub declared_value: Decimal,
    /// `chosen_base - declared_value`, strictly positive.
    pub difference: Decimal,
    /// Effective Simples Nacional rate applied, in percent.
    pub effective_rate: Decimal,
    /// `difference * (effective_rate/100) * ICMS_SHARE_SIMPLES`.
    pub credit_estimate: Decimal,
}
