//! Spreadsheet / delimited-text import.
//!
//! Exports from accounting systems arrive as CSV (or spreadsheets saved
//! as CSV) with loosely spelled headers and float-typed code columns.
//! The importer normalizes both and produces the same
//! [`LineItem`](crate::core::LineItem) shape as the NF-e parser, so the
//! two sources feed one downstream pipeline.

mod import;

pub use import::{Import, import_csv, import_rows, strip_float_suffix};
