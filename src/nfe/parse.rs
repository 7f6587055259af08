use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::{DocumentError, Invoice, LineError, LineItem, ParseError, REGIME_CODE_UNKNOWN};
use crate::nfe::dom::{Element, parse_tree};

/// Outcome of parsing a batch of NF-e documents.
///
/// One document's failure never aborts its siblings; every rejected
/// document appears in `errors` with its identifier and reason.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub invoices: Vec<Invoice>,
    pub errors: Vec<DocumentError>,
}

/// Parse a batch of `(source_id, xml)` pairs, typically file names and
/// their contents.
pub fn parse_batch<'a>(docs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Batch {
    let mut batch = Batch::default();
    for (source_id, xml) in docs {
        match parse_nfe(xml) {
            Ok(invoice) => batch.invoices.push(invoice),
            Err(error) => batch.errors.push(DocumentError {
                source_id: source_id.to_string(),
                error,
            }),
        }
    }
    batch
}

/// Parse one NF-e document.
///
/// Accepts both `<nfeProc>`-wrapped and bare `<NFe>` documents. Header
/// fields (nNF, dhEmi) are structural prerequisites: if either is
/// missing or unparsable the whole document is rejected. Line-level
/// problems reject only that line and are reported in
/// [`Invoice::rejected_lines`].
///
/// Pure transform — nothing is logged here; the caller decides how to
/// surface errors.
pub fn parse_nfe(xml: &str) -> Result<Invoice, ParseError> {
    let root = parse_tree(xml)?;

    let inf_nfe = root
        .find_first("infNFe")
        .ok_or_else(|| ParseError::structure("infNFe", "not found — not an NF-e document?"))?;
    let ide = inf_nfe
        .child("ide")
        .ok_or_else(|| ParseError::structure("ide", "not found"))?;

    let number = ide
        .child_text("nNF")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ParseError::structure("nNF", "missing"))?
        .to_string();
    let issue_date = parse_issue_date(ide)?;

    let mut items = Vec::new();
    let mut rejected_lines = Vec::new();
    for (index, det) in inf_nfe.find_all("det").into_iter().enumerate() {
        let line_id = det
            .attr("nItem")
            .map(str::to_string)
            .unwrap_or_else(|| (index + 1).to_string());
        match parse_det(det, &number, issue_date) {
            Ok(item) => items.push(item),
            Err((field, reason)) => rejected_lines.push(LineError::new(line_id, field, reason)),
        }
    }

    Ok(Invoice {
        number,
        issue_date,
        items,
        rejected_lines,
    })
}

/// Parse one NF-e document from raw bytes.
///
/// The NF-e standard mandates UTF-8; anything else is rejected as a
/// document-level error.
pub fn parse_nfe_bytes(bytes: &[u8]) -> Result<Invoice, ParseError> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::Xml(format!("document is not UTF-8: {e}")))?;
    parse_nfe(xml)
}

/// dhEmi is an ISO-8601 timestamp with offset; the first 10 characters
/// are the calendar date. Older layout-2.0 notes carry a date-only
/// dEmi instead.
fn parse_issue_date(ide: &Element) -> Result<NaiveDate, ParseError> {
    let raw = ide
        .child_text("dhEmi")
        .or_else(|| ide.child_text("dEmi"))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ParseError::structure("dhEmi", "missing"))?;
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| ParseError::structure("dhEmi", format!("not a date ({raw:?}): {e}")))
}

type LineFailure = (&'static str, String);

fn parse_det(
    det: &Element,
    invoice_number: &str,
    issue_date: NaiveDate,
) -> Result<LineItem, LineFailure> {
    let prod = det
        .child("prod")
        .ok_or_else(|| ("prod", "missing".to_string()))?;

    let required = |field: &'static str| -> Result<String, LineFailure> {
        prod.child_text(field)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or((field, "missing".to_string()))
    };

    let ncm_code = required("NCM")?;
    let cfop_code = required("CFOP")?;
    let raw_value = required("vProd")?;
    let value: Decimal = raw_value
        .parse()
        .map_err(|e| ("vProd", format!("not a number ({raw_value:?}): {e}")))?;
    if value < Decimal::ZERO {
        return Err(("vProd", format!("negative value: {raw_value}")));
    }

    let description = prod.child_text("xProd").unwrap_or_default().to_string();
    let tax_regime_code = det
        .child("imposto")
        .and_then(declared_regime_code)
        .unwrap_or_else(|| REGIME_CODE_UNKNOWN.to_string());

    Ok(LineItem {
        source_document_id: invoice_number.to_string(),
        issue_date: Some(issue_date),
        description,
        ncm_code,
        cfop_code,
        tax_regime_code,
        value,
    })
}

/// The CSOSN nested somewhere inside the imposto subtree.
///
/// The depth varies with the ICMS layout variant, so the whole subtree
/// is searched. When the code recurs (one per applicable tax authority)
/// the LAST occurrence in document order wins — the regime-specific
/// code is generally listed last. Best-effort heuristic pending
/// domain-expert confirmation, applied explicitly here so it stays
/// auditable.
fn declared_regime_code(imposto: &Element) -> Option<String> {
    let occurrences = imposto.find_all("CSOSN");
    occurrences
        .last()
        .map(|e| e.text.trim().to_string())
        .filter(|t| !t.is_empty())
}
