//! # recupera
//!
//! NF-e tax-credit recovery toolkit for footwear industries under the
//! Simples Nacional regime: parse electronic invoices or spreadsheet
//! exports into line items, classify each line by ICMS tax-substitution
//! rules, reconcile the ST subtotal against the declared tax base, and
//! estimate the recoverable credit plus its time-value projection.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating
//! point. Parsing is lossless about failures: rejected documents, lines,
//! and rows are returned individually with reasons, never swallowed.
//!
//! ## Quick Start
//!
//! ```rust
//! use recupera::core::*;
//! use rust_decimal_macros::dec;
//!
//! let item = LineItem {
//!     source_document_id: "123".into(),
//!     issue_date: None,
//!     description: "Tênis esportivo".into(),
//!     ncm_code: "64041900".into(),
//!     cfop_code: "5405".into(),
//!     tax_regime_code: "102".into(),
//!     value: dec!(10000),
//! };
//!
//! let classified = classify(item);
//! assert!(classified.is_footwear && classified.is_tax_substitution);
//! assert!(classified.treatment_mismatch); // ST line not declared as CSOSN 500
//!
//! let mut session = Session::new();
//! session.ingest("xml-batch", &[classified]);
//! let finding = session
//!     .reconcile_group("xml-batch", dec!(7000), dec!(8.5))
//!     .unwrap();
//! match finding {
//!     Finding::Credit(r) => assert_eq!(r.credit_estimate, dec!(85.425)),
//!     Finding::NoCredit { .. } => unreachable!(),
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Domain types, classification, aggregation, reconciliation, session |
//! | `nfe` | NF-e XML parsing |
//! | `tabular` | Spreadsheet/CSV import |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "nfe")]
pub mod nfe;

#[cfg(feature = "tabular")]
pub mod tabular;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
