// src/chart/mod.rs

pub mod adapters;
pub mod geometry;
pub mod theme;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::table::ParsedTable;
use theme::Color;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Renderer-neutral chart data: one label per category and one value per
/// label in every series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn new(labels: Vec<String>, series: Vec<Series>) -> Result<Self> {
        for s in &series {
            if s.values.len() != labels.len() {
                bail!(
                    "series `{}` has {} values for {} labels",
                    s.name,
                    s.values.len(),
                    labels.len()
                );
            }
        }
        Ok(Self { labels, series })
    }

    /// Projects `label_column` and each `(name, column)` pair out of `table`.
    /// Every column is read from the same rows so the lengths always agree.
    pub fn from_table(table: &ParsedTable, label_column: &str, columns: &[(&str, &str)]) -> Self {
        Self {
            labels: table.label_column(label_column),
            series: columns
                .iter()
                .map(|(name, column)| Series {
                    name: name.to_string(),
                    values: table.numeric_column(column),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

/// Presentation settings that travel with a spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub colors: Vec<Color>,
    /// Shade the area under each line.
    pub fill: bool,
}

impl ChartOptions {
    pub fn new(title: impl Into<String>, colors: &[Color]) -> Self {
        Self {
            title: title.into(),
            colors: colors.to_vec(),
            fill: false,
        }
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    pub fn color(&self, index: usize) -> Color {
        theme::pick(&self.colors, index)
    }
}
