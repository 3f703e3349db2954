// src/chart/adapters.rs
//
// The four deck charts: which CSV each one reads, which columns it projects
// and how it is drawn.

use anyhow::Result;
use tracing::{info, instrument};

use super::{
    theme::{BALANCE_SHEET_PALETTE, DOUGHNUT_PALETTE, LINE_PALETTE},
    ChartKind, ChartOptions, ChartSpec,
};
use crate::{
    cache::DataCache,
    render::{ChartRenderer, SurfaceRegistry},
    table::ParsedTable,
};

pub const PL_PROJECTIONS: &str = "data/pl_projections.csv";
pub const DSCR_DATA: &str = "data/dscr_data.csv";
pub const BALANCE_SHEET: &str = "data/balance_sheet_projections.csv";
pub const MACHINERY: &str = "data/machinery_breakdown.csv";

pub const YEAR: &str = "Year";
pub const REVENUE: &str = "Revenue";
pub const EBITDA: &str = "EBITDA";
pub const PAT: &str = "PAT";
pub const DSCR: &str = "DSCR";
pub const TOTAL_ASSETS: &str = "Total Assets";
pub const PARTNERS_CAPITAL: &str = "Partners Capital";
pub const TERM_LOANS: &str = "Term Loans";
pub const COMPONENT: &str = "Component";
pub const MACHINERY_COST: &str = "Cost (₹ Lakhs)";

/// Everything a renderer needs for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartJob {
    pub kind: ChartKind,
    pub spec: ChartSpec,
    pub options: ChartOptions,
}

pub fn revenue_job(table: &ParsedTable) -> ChartJob {
    ChartJob {
        kind: ChartKind::Line,
        spec: ChartSpec::from_table(
            table,
            YEAR,
            &[(REVENUE, REVENUE), (EBITDA, EBITDA), (PAT, PAT)],
        ),
        options: ChartOptions::new("7-Year Financial Projections", &LINE_PALETTE).filled(),
    }
}

pub fn dscr_job(table: &ParsedTable) -> ChartJob {
    ChartJob {
        kind: ChartKind::Bar,
        spec: ChartSpec::from_table(table, YEAR, &[("DSCR Ratio", DSCR)]),
        options: ChartOptions::new("Debt Service Coverage Ratio (DSCR) Analysis", &[]),
    }
}

pub fn balance_sheet_job(table: &ParsedTable) -> ChartJob {
    ChartJob {
        kind: ChartKind::Line,
        spec: ChartSpec::from_table(
            table,
            YEAR,
            &[
                (TOTAL_ASSETS, TOTAL_ASSETS),
                (PARTNERS_CAPITAL, PARTNERS_CAPITAL),
                (TERM_LOANS, TERM_LOANS),
            ],
        ),
        options: ChartOptions::new("Balance Sheet Projections", &BALANCE_SHEET_PALETTE),
    }
}

pub fn machinery_job(table: &ParsedTable) -> ChartJob {
    ChartJob {
        kind: ChartKind::Doughnut,
        spec: ChartSpec::from_table(table, COMPONENT, &[("Cost", MACHINERY_COST)]),
        options: ChartOptions::new("Machinery Cost Breakdown", &DOUGHNUT_PALETTE),
    }
}

async fn generate(
    cache: &DataCache,
    surfaces: &SurfaceRegistry,
    renderer: &dyn ChartRenderer,
    surface_id: &str,
    resource: &str,
    build: fn(&ParsedTable) -> ChartJob,
) -> Result<bool> {
    let table = cache.load(resource).await;
    let job = build(&table);
    let drew = surfaces.paint(surface_id, renderer, job.kind, &job.spec, &job.options)?;
    if drew {
        info!(
            surface = surface_id,
            points = job.spec.labels.len(),
            renderer = renderer.name(),
            "chart rendered"
        );
    }
    Ok(drew)
}

#[instrument(level = "debug", skip(cache, surfaces, renderer))]
pub async fn generate_revenue_chart(
    cache: &DataCache,
    surfaces: &SurfaceRegistry,
    renderer: &dyn ChartRenderer,
    surface_id: &str,
) -> Result<bool> {
    generate(cache, surfaces, renderer, surface_id, PL_PROJECTIONS, revenue_job).await
}

#[instrument(level = "debug", skip(cache, surfaces, renderer))]
pub async fn generate_dscr_chart(
    cache: &DataCache,
    surfaces: &SurfaceRegistry,
    renderer: &dyn ChartRenderer,
    surface_id: &str,
) -> Result<bool> {
    generate(cache, surfaces, renderer, surface_id, DSCR_DATA, dscr_job).await
}

#[instrument(level = "debug", skip(cache, surfaces, renderer))]
pub async fn generate_balance_sheet_chart(
    cache: &DataCache,
    surfaces: &SurfaceRegistry,
    renderer: &dyn ChartRenderer,
    surface_id: &str,
) -> Result<bool> {
    generate(cache, surfaces, renderer, surface_id, BALANCE_SHEET, balance_sheet_job).await
}

#[instrument(level = "debug", skip(cache, surfaces, renderer))]
pub async fn generate_machinery_chart(
    cache: &DataCache,
    surfaces: &SurfaceRegistry,
    renderer: &dyn ChartRenderer,
    surface_id: &str,
) -> Result<bool> {
    generate(cache, surfaces, renderer, surface_id, MACHINERY, machinery_job).await
}
