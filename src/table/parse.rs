// src/table/parse.rs

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{CellValue, ParsedTable, Row};

/// Optional sign, digits, at most one decimal point. No exponents, no
/// thousands separators.
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)$").expect("numeric pattern should compile"));

pub fn is_numeric(field: &str) -> bool {
    NUMERIC.is_match(field)
}

/// Numeric-looking fields that overflow `f64` stay text.
fn coerce(field: &str) -> CellValue {
    if is_numeric(field) {
        match field.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(field.to_string()),
        }
    } else {
        CellValue::Text(field.to_string())
    }
}

/// Parses comma-delimited text whose first line is the header row.
///
/// Quoting is off, so every comma splits a field. Fields are trimmed. A row
/// with too few fields gets `CellValue::Missing` for the trailing headers and
/// surplus fields are dropped, so a line with an embedded comma shifts its
/// values silently. Blank lines are skipped. A repeated header keeps the
/// last field under that name.
pub fn parse_csv(text: &str) -> ParsedTable {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedTable::empty();
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short and long rows are mapped positionally
        .quoting(false)
        .trim(Trim::All)
        .from_reader(trimmed.as_bytes());

    let headers: Vec<String> = match rdr.headers() {
        Ok(record) => record.iter().map(str::to_string).collect(),
        Err(e) => {
            warn!(error = %e, "unreadable CSV header");
            return ParsedTable::empty();
        }
    };

    let rows = rdr
        .records()
        .enumerate()
        .filter_map(|(idx, result)| match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(record = idx, error = %e, "skipping unreadable CSV record");
                None
            }
        })
        .filter(|record| record.iter().any(|field| !field.is_empty()))
        .map(|record| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = record.get(idx).map_or(CellValue::Missing, coerce);
                    (header.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    ParsedTable { headers, rows }
}
