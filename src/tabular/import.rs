use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::Read;

use crate::core::{ImportError, LineItem, REGIME_CODE_UNKNOWN, RowError};

/// Column aliases, tried in order. Headers are matched after
/// normalization (trim + uppercase), so "valor total" and "Valor Total"
/// are the same column.
const CFOP_COLUMNS: [&str; 1] = ["CFOP"];
const VALUE_COLUMNS: [&str; 2] = ["VALOR", "VALOR TOTAL"];
const NCM_COLUMNS: [&str; 1] = ["NCM"];
const CSOSN_COLUMNS: [&str; 2] = ["CSOSN", "CSOSN/CST"];
const DESCRIPTION_COLUMNS: [&str; 3] = ["DESCRICAO", "DESCRIÇÃO", "PRODUTO"];
const SOURCE_COLUMNS: [&str; 3] = ["NOTA", "NOTA FISCAL", "NUMERO"];

/// Outcome of a tabular import: the rows that converted cleanly plus a
/// per-row error list. The import as a whole only fails when required
/// columns are absent.
#[derive(Debug, Clone, Default)]
pub struct Import {
    pub items: Vec<LineItem>,
    pub row_errors: Vec<RowError>,
}

/// Normalize a header or cell key for lookup.
fn normalize_header(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Strip the trailing ".0" a CFOP picks up when a spreadsheet stores
/// the code in a float-typed cell (5405 → "5405.0").
pub fn strip_float_suffix(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(code) => code.to_string(),
        None => trimmed.to_string(),
    }
}

struct Columns {
    cfop: String,
    value: String,
    ncm: Option<String>,
    csosn: Option<String>,
    description: Option<String>,
    source: Option<String>,
}

impl Columns {
    /// Resolve aliases against the normalized header set. CFOP and a
    /// value column are required; everything else is optional.
    fn resolve<'a>(headers: impl Iterator<Item = &'a str>) -> Result<Self, ImportError> {
        let present: Vec<String> = headers.map(normalize_header).collect();
        let pick = |aliases: &[&str]| -> Option<String> {
            aliases
                .iter()
                .find(|a| present.iter().any(|h| h == *a))
                .map(|a| a.to_string())
        };
        let require = |aliases: &[&str]| -> Result<String, ImportError> {
            pick(aliases).ok_or_else(|| ImportError::MissingColumn {
                tried: aliases.iter().map(|a| a.to_string()).collect(),
            })
        };

        Ok(Self {
            cfop: require(&CFOP_COLUMNS)?,
            value: require(&VALUE_COLUMNS)?,
            ncm: pick(&NCM_COLUMNS),
            csosn: pick(&CSOSN_COLUMNS),
            description: pick(&DESCRIPTION_COLUMNS),
            source: pick(&SOURCE_COLUMNS),
        })
    }
}

/// Import pre-split rows (string-keyed mappings, one per data row).
///
/// Column names are matched case-insensitively; the monetary value is
/// looked up under "VALOR" with "VALOR TOTAL" as a documented fallback.
/// Malformed rows are excluded and reported individually; only missing
/// required columns fail the whole import.
pub fn import_rows(rows: &[BTreeMap<String, String>]) -> Result<Import, ImportError> {
    let mut headers: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    let columns = Columns::resolve(headers.into_iter())?;

    let mut import = Import::default();
    for (index, row) in rows.iter().enumerate() {
        let normalized: BTreeMap<String, &str> = row
            .iter()
            .map(|(k, v)| (normalize_header(k), v.as_str()))
            .collect();
        match convert_row(&columns, &normalized) {
            Ok(item) => import.items.push(item),
            Err(reason) => import.row_errors.push(RowError {
                row: index + 1,
                reason,
            }),
        }
    }
    Ok(import)
}

fn convert_row(columns: &Columns, row: &BTreeMap<String, &str>) -> Result<LineItem, String> {
    let cell = |name: &str| row.get(name).copied().unwrap_or("").trim();

    let cfop_code = strip_float_suffix(cell(&columns.cfop));
    if cfop_code.is_empty() {
        return Err(format!("empty {} cell", columns.cfop));
    }

    let raw_value = cell(&columns.value);
    let value: Decimal = raw_value
        .parse()
        .map_err(|e| format!("{} not a number ({raw_value:?}): {e}", columns.value))?;
    if value < Decimal::ZERO {
        return Err(format!("{} is negative: {raw_value}", columns.value));
    }

    // When the sheet has an NCM column an empty cell rejects the row;
    // a sheet without the column at all still imports (classified as
    // non-footwear via the sentinel).
    let ncm_code = match &columns.ncm {
        Some(col) => {
            let ncm = cell(col);
            if ncm.is_empty() {
                return Err(format!("empty {col} cell"));
            }
            ncm.to_string()
        }
        None => REGIME_CODE_UNKNOWN.to_string(),
    };

    let tax_regime_code = columns
        .csosn
        .as_deref()
        .map(cell)
        .filter(|t| !t.is_empty())
        .map(strip_float_suffix)
        .unwrap_or_else(|| REGIME_CODE_UNKNOWN.to_string());

    Ok(LineItem {
        source_document_id: columns
            .source
            .as_deref()
            .map(cell)
            .map(strip_float_suffix)
            .unwrap_or_default(),
        issue_date: None,
        description: columns
            .description
            .as_deref()
            .map(cell)
            .unwrap_or_default()
            .to_string(),
        ncm_code,
        cfop_code,
        tax_regime_code,
        value,
    })
}

/// Import delimited text (CSV) with a header row.
///
/// Thin convenience over [`import_rows`]: reads headers and records via
/// the `csv` crate, then applies the same alias and row semantics.
pub fn import_csv<R: Read>(reader: R) -> Result<Import, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| ImportError::Csv(e.to_string()))?
        .clone();

    let mut rows: Vec<BTreeMap<String, String>> = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| ImportError::Csv(e.to_string()))?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    import_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_float_artifact() {
        assert_eq!(strip_float_suffix("5405.0"), "5405");
        assert_eq!(strip_float_suffix(" 5405 "), "5405");
        assert_eq!(strip_float_suffix("5405"), "5405");
        // Only the float round-trip artifact is stripped.
        assert_eq!(strip_float_suffix("5405.00"), "5405.00");
    }

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("  Valor Total "), "VALOR TOTAL");
    }
}
