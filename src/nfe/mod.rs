//! NF-e XML parsing.
//!
//! Decodes Brazilian electronic invoices (modelo 55) into [`Invoice`]
//! records: header from `ide`, one [`LineItem`] per `det`, with the
//! CSOSN located anywhere inside the `imposto` subtree.
//!
//! [`Invoice`]: crate::core::Invoice
//! [`LineItem`]: crate::core::LineItem
//!
//! # Example
//!
//! ```no_run
//! use recupera::nfe;
//!
//! let xml: String = std::fs::read_to_string("nota.xml").unwrap();
//! let invoice = nfe::parse_nfe(&xml).unwrap();
//! for line in &invoice.rejected_lines {
//!     eprintln!("{}: {line}", invoice.number);
//! }
//! ```

pub mod dom;
mod parse;

pub use parse::{Batch, parse_batch, parse_nfe, parse_nfe_bytes};

/// NF-e XML namespace.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";
