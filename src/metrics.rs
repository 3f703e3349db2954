// src/metrics.rs

use serde::Serialize;

use crate::{
    chart::adapters::{DSCR, MACHINERY_COST, REVENUE},
    table::ParsedTable,
};

/// Headline figures for the deck's summary cards. Amounts are ₹ lakhs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_revenue: f64,
    pub avg_dscr: f64,
    pub machinery_cost: f64,
    pub years: usize,
}

impl DashboardMetrics {
    pub fn compute(pl: &ParsedTable, dscr: &ParsedTable, machinery: &ParsedTable) -> Self {
        let coverage = dscr.numeric_column(DSCR);
        let avg_dscr = if coverage.is_empty() {
            0.0
        } else {
            coverage.iter().fold(0.0, |acc, v| acc + v) / coverage.len() as f64
        };
        Self {
            total_revenue: pl.column_sum(REVENUE),
            avg_dscr,
            machinery_cost: machinery.column_sum(MACHINERY_COST),
            years: pl.rows.len(),
        }
    }

    /// Revenue card text: lakhs shown as crores, e.g. `₹45.5 Cr`.
    pub fn revenue_card(&self) -> String {
        format!("₹{:.1} Cr", self.total_revenue / 100.0)
    }

    pub fn dscr_card(&self) -> String {
        format!("{:.2}", self.avg_dscr)
    }
}
