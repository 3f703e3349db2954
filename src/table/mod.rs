// src/table/mod.rs

pub mod parse;

pub use parse::{is_numeric, parse_csv};

use crate::chart::theme::amount;
use serde::Serialize;
use std::{collections::HashMap, fmt};

/// A single parsed CSV field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// The row was shorter than the header line.
    Missing,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the cell as an axis label. Whole numbers print without a
    /// fractional part so a `2024` year column stays `2024`.
    pub fn as_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&amount(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => Ok(()),
        }
    }
}

/// One data line, keyed by header name.
pub type Row = HashMap<String, CellValue>;

/// Headers in file order plus every data row in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl ParsedTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Projects `column` as numbers. Text and missing cells become `0.0`.
    pub fn numeric_column(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.get(column).and_then(CellValue::as_number).unwrap_or(0.0))
            .collect()
    }

    /// Projects `column` as display labels.
    pub fn label_column(&self, column: &str) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(column).map(CellValue::as_label).unwrap_or_default())
            .collect()
    }

    /// Sum of the numeric projection; `0.0` (never `-0.0`) for no rows.
    pub fn column_sum(&self, column: &str) -> f64 {
        self.numeric_column(column)
            .iter()
            .fold(0.0, |acc, v| acc + v)
    }
}
