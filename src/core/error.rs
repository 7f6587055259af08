use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document-level parse failure — the whole NF-e is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A structural prerequisite (invoice number, issue date) could not
    /// be located or parsed.
    #[error("structural field '{field}' {reason}")]
    Structure { field: String, reason: String },

    /// The document is not well-formed XML, or is not an NF-e at all.
    #[error("XML error: {0}")]
    Xml(String),
}

impl ParseError {
    pub(crate) fn structure(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structure {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// One rejected line within an otherwise accepted invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    /// det nItem attribute when present, otherwise the 1-based position.
    pub line_id: String,
    /// Field that failed (e.g. "CFOP", "vProd").
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} {}", self.line_id, self.field, self.reason)
    }
}

impl LineError {
    pub(crate) fn new(
        line_id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            line_id: line_id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A document that failed to parse, reported alongside its batch
/// siblings so the consultant can correct the source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_id}: {error}")]
pub struct DocumentError {
    /// Caller-supplied document identifier (typically the file name).
    pub source_id: String,
    pub error: ParseError,
}

/// Batch-level import failure — the whole tabular import is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// A required column is absent under every recognized alias.
    #[error("missing required column: tried {tried:?}")]
    MissingColumn { tried: Vec<String> },

    /// The underlying delimited-text reader failed.
    #[error("CSV error: {0}")]
    Csv(String),
}

/// One rejected row within an otherwise accepted import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based data row number (header row not counted).
    pub row: usize,
    pub reason: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

/// Invalid reconciliation input. Distinct from
/// [`Finding::NoCredit`](crate::core::Finding::NoCredit), which is a
/// valid computed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    #[error("declared value must not be negative: {0}")]
    NegativeDeclared(Decimal),

    #[error("rate must not be negative: {0}")]
    NegativeRate(Decimal),

    /// Session lookup referenced a group id that was never ingested.
    #[error("unknown subtotal group: {0}")]
    UnknownGroup(String),
}
