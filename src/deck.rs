// src/deck.rs

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::{
    cache::DataCache,
    chart::adapters::{self, DSCR_DATA, MACHINERY, PL_PROJECTIONS},
    config::DeckConfig,
    fetch::provider_for,
    metrics::DashboardMetrics,
    render::{self, ChartRenderer, SurfaceRegistry},
};

pub const REVENUE_SURFACE: &str = "plChart";
pub const DSCR_SURFACE: &str = "dscrChart";
pub const BALANCE_SHEET_SURFACE: &str = "balanceSheetChart";
pub const MACHINERY_SURFACE: &str = "machineryChart";

pub const SURFACE_IDS: [&str; 4] = [
    REVENUE_SURFACE,
    BALANCE_SHEET_SURFACE,
    DSCR_SURFACE,
    MACHINERY_SURFACE,
];

/// What happened to each chart during [`ChartDeck::init_charts`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InitReport {
    pub rendered: Vec<String>,
    /// No surface was registered under the id.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl InitReport {
    fn record(&mut self, surface: &str, outcome: Result<bool>) {
        match outcome {
            Ok(true) => self.rendered.push(surface.to_string()),
            Ok(false) => self.skipped.push(surface.to_string()),
            Err(e) => {
                error!(surface, error = %format!("{:#}", e), "Error initializing chart");
                self.failed.push((surface.to_string(), e.to_string()));
            }
        }
    }

    pub fn all_rendered(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Owns the data cache, the renderer chosen at startup and the host's
/// surfaces, and drives the four chart entry points.
pub struct ChartDeck {
    cache: DataCache,
    renderer: Box<dyn ChartRenderer>,
    surfaces: SurfaceRegistry,
}

impl ChartDeck {
    pub fn new(cache: DataCache, renderer: Box<dyn ChartRenderer>, surfaces: SurfaceRegistry) -> Self {
        Self {
            cache,
            renderer,
            surfaces,
        }
    }

    /// Builds the provider, probes the renderer and registers the standard
    /// surfaces at the configured size.
    pub fn from_config(config: &DeckConfig) -> Result<Self> {
        let provider = provider_for(&config.data_source)
            .with_context(|| format!("data source {}", config.data_source))?;
        let surfaces = SurfaceRegistry::new();
        for id in SURFACE_IDS {
            surfaces.register(id, config.surface_width, config.surface_height);
        }
        Ok(Self::new(
            DataCache::new(provider),
            render::probe(config.renderer),
            surfaces,
        ))
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    pub async fn revenue_chart(&self, surface_id: &str) -> Result<bool> {
        adapters::generate_revenue_chart(&self.cache, &self.surfaces, self.renderer.as_ref(), surface_id)
            .await
    }

    pub async fn dscr_chart(&self, surface_id: &str) -> Result<bool> {
        adapters::generate_dscr_chart(&self.cache, &self.surfaces, self.renderer.as_ref(), surface_id)
            .await
    }

    pub async fn balance_sheet_chart(&self, surface_id: &str) -> Result<bool> {
        adapters::generate_balance_sheet_chart(
            &self.cache,
            &self.surfaces,
            self.renderer.as_ref(),
            surface_id,
        )
        .await
    }

    pub async fn machinery_chart(&self, surface_id: &str) -> Result<bool> {
        adapters::generate_machinery_chart(&self.cache, &self.surfaces, self.renderer.as_ref(), surface_id)
            .await
    }

    /// Runs all four charts concurrently. A failure in one chart is logged
    /// and recorded without touching the others.
    pub async fn init_charts(&self) -> InitReport {
        info!(renderer = self.renderer.name(), "Initializing dynamic charts");
        let (revenue, balance, dscr, machinery) = tokio::join!(
            self.revenue_chart(REVENUE_SURFACE),
            self.balance_sheet_chart(BALANCE_SHEET_SURFACE),
            self.dscr_chart(DSCR_SURFACE),
            self.machinery_chart(MACHINERY_SURFACE),
        );

        let mut report = InitReport::default();
        report.record(REVENUE_SURFACE, revenue);
        report.record(BALANCE_SHEET_SURFACE, balance);
        report.record(DSCR_SURFACE, dscr);
        report.record(MACHINERY_SURFACE, machinery);

        if report.all_rendered() {
            info!(charts = report.rendered.len(), "All charts initialized");
        } else {
            warn!(
                rendered = report.rendered.len(),
                skipped = report.skipped.len(),
                failed = report.failed.len(),
                "charts initialized with gaps"
            );
        }
        report
    }

    /// Summary figures, read through the same cache as the charts.
    pub async fn dashboard_metrics(&self) -> DashboardMetrics {
        let (pl, dscr, machinery) = tokio::join!(
            self.cache.load(PL_PROJECTIONS),
            self.cache.load(DSCR_DATA),
            self.cache.load(MACHINERY),
        );
        let metrics = DashboardMetrics::compute(&pl, &dscr, &machinery);
        info!(
            total_revenue = %format!("{} Lakhs", metrics.total_revenue),
            avg_dscr = %metrics.dscr_card(),
            machinery_cost = %format!("{} Lakhs", metrics.machinery_cost),
            "Dashboard updated with real data"
        );
        metrics
    }

    /// Writes every painted surface to `<dir>/<id>.svg`.
    pub fn write_surfaces(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut written = Vec::new();
        for surface in self.surfaces.painted() {
            let path = dir.join(format!("{}.svg", surface.id));
            fs::write(&path, surface.svg().unwrap_or_default())
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::tests::StubProvider, chart::adapters::BALANCE_SHEET, render::FallbackRenderer,
    };
    use anyhow::bail;
    use std::sync::{atomic::Ordering, Arc};
    use tempfile::tempdir;

    const PL: &str = "Year,Revenue,EBITDA,PAT\nFY26,1800,320,140\nFY27,2750,510,240\n";
    const DSCR_CSV: &str = "Year,DSCR\nFY26,1.12\nFY27,1.25\nFY28,1.71\n";
    const BS: &str = "Year,Total Assets,Partners Capital,Term Loans\nFY26,2100,600,1200\n";
    const MACH: &str = "Component,Cost (₹ Lakhs)\nCNC,120\nPress,80\n";

    fn deck_with(files: &[(&str, &str)], ids: &[&str]) -> (ChartDeck, Arc<std::sync::atomic::AtomicUsize>) {
        let stub = StubProvider::with(files);
        let fetches = Arc::clone(&stub.fetches);
        let surfaces = SurfaceRegistry::new();
        for id in ids {
            surfaces.register(id, 640, 360);
        }
        let deck = ChartDeck::new(
            DataCache::new(Box::new(stub)),
            Box::new(FallbackRenderer),
            surfaces,
        );
        (deck, fetches)
    }

    #[tokio::test]
    async fn test_init_renders_all_four() {
        let (deck, fetches) = deck_with(
            &[
                (PL_PROJECTIONS, PL),
                (DSCR_DATA, DSCR_CSV),
                (BALANCE_SHEET, BS),
                (MACHINERY, MACH),
            ],
            &SURFACE_IDS,
        );
        let report = deck.init_charts().await;
        assert!(report.all_rendered(), "{report:?}");
        assert_eq!(report.rendered.len(), 4);
        assert_eq!(fetches.load(Ordering::SeqCst), 4);

        // metrics come from the cache
        let metrics = deck.dashboard_metrics().await;
        assert_eq!(fetches.load(Ordering::SeqCst), 4);
        assert_eq!(metrics.total_revenue, 4550.0);
        assert_eq!(metrics.machinery_cost, 200.0);
    }

    #[tokio::test]
    async fn test_one_missing_surface_does_not_block_siblings() {
        let (deck, _) = deck_with(
            &[(PL_PROJECTIONS, PL), (DSCR_DATA, DSCR_CSV)],
            &[REVENUE_SURFACE, DSCR_SURFACE, MACHINERY_SURFACE],
        );
        let report = deck.init_charts().await;
        assert_eq!(report.skipped, vec![BALANCE_SHEET_SURFACE.to_string()]);
        // machinery csv is absent: the chart still paints, empty
        assert!(report.rendered.contains(&MACHINERY_SURFACE.to_string()));
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_cell_does_not_stall_siblings() {
        let dscr = format!("Year,DSCR\nFY26,1.3\nFY27,{}\n", "9".repeat(400));
        let (deck, _) = deck_with(
            &[
                (PL_PROJECTIONS, PL),
                (DSCR_DATA, dscr.as_str()),
                (BALANCE_SHEET, BS),
                (MACHINERY, MACH),
            ],
            &SURFACE_IDS,
        );
        let report = deck.init_charts().await;
        assert!(report.all_rendered(), "{report:?}");
        let svg = deck
            .surfaces()
            .get(DSCR_SURFACE)
            .and_then(|s| s.svg().map(str::to_string))
            .unwrap_or_default();
        assert!(svg.contains("1.30"));
        assert!(!svg.contains("NaN"));
    }

    struct BrokenRenderer;

    impl ChartRenderer for BrokenRenderer {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn render(
            &self,
            surface: &mut render::Surface,
            _kind: crate::chart::ChartKind,
            _spec: &crate::chart::ChartSpec,
            _options: &crate::chart::ChartOptions,
        ) -> Result<()> {
            if surface.id == DSCR_SURFACE {
                bail!("backend exploded");
            }
            surface.present("<svg/>".to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_render_failure_is_isolated() {
        let surfaces = SurfaceRegistry::new();
        for id in SURFACE_IDS {
            surfaces.register(id, 100, 100);
        }
        let deck = ChartDeck::new(
            DataCache::new(Box::new(StubProvider::default())),
            Box::new(BrokenRenderer),
            surfaces,
        );
        let report = deck.init_charts().await;
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, DSCR_SURFACE);
        assert_eq!(report.rendered.len(), 3);
    }

    #[tokio::test]
    async fn test_write_surfaces() -> Result<()> {
        let (deck, _) = deck_with(&[(DSCR_DATA, DSCR_CSV)], &[DSCR_SURFACE, REVENUE_SURFACE]);
        deck.dscr_chart(DSCR_SURFACE).await?;

        let tmp = tempdir()?;
        let written = deck.write_surfaces(tmp.path())?;
        assert_eq!(written, vec![tmp.path().join("dscrChart.svg")]);
        let svg = fs::read_to_string(&written[0])?;
        assert!(svg.contains("1.71"));
        Ok(())
    }

    #[test]
    fn test_from_config_registers_surfaces() -> Result<()> {
        let config = DeckConfig {
            renderer: render::RendererChoice::Fallback,
            ..DeckConfig::default()
        };
        let deck = ChartDeck::from_config(&config)?;
        assert_eq!(deck.renderer_name(), "fallback");
        for id in SURFACE_IDS {
            assert!(deck.surfaces().contains(id));
        }
        Ok(())
    }
}
