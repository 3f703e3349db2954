// src/render/mod.rs

pub mod canvas;
#[cfg(feature = "plotters")]
pub mod plotting;
pub mod simple;
pub mod surface;

pub use simple::{FallbackRenderer, SimpleChart};
pub use surface::{Surface, SurfaceRegistry};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chart::{ChartKind, ChartOptions, ChartSpec};

/// Something that can paint a chart onto a surface.
pub trait ChartRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fully repaints `surface`.
    fn render(
        &self,
        surface: &mut Surface,
        kind: ChartKind,
        spec: &ChartSpec,
        options: &ChartOptions,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererChoice {
    /// Plotters when compiled in, otherwise the fallback.
    #[default]
    Auto,
    Plotters,
    Fallback,
}

/// Whether the full charting backend was compiled into this build.
pub fn plotters_available() -> bool {
    cfg!(feature = "plotters")
}

/// Picks the renderer once at startup.
pub fn probe(choice: RendererChoice) -> Box<dyn ChartRenderer> {
    let renderer = select(choice, plotters_available());
    info!(renderer = renderer.name(), ?choice, "renderer selected");
    renderer
}

fn select(choice: RendererChoice, available: bool) -> Box<dyn ChartRenderer> {
    match (choice, available) {
        (RendererChoice::Fallback, _) => Box::new(FallbackRenderer),
        (RendererChoice::Auto, true) | (RendererChoice::Plotters, true) => primary(),
        (RendererChoice::Plotters, false) => {
            warn!("plotters renderer requested but not compiled in; using fallback");
            Box::new(FallbackRenderer)
        }
        (RendererChoice::Auto, false) => Box::new(FallbackRenderer),
    }
}

#[cfg(feature = "plotters")]
fn primary() -> Box<dyn ChartRenderer> {
    Box::new(plotting::PlottersRenderer)
}

#[cfg(not(feature = "plotters"))]
fn primary() -> Box<dyn ChartRenderer> {
    Box::new(FallbackRenderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_library_absent() {
        assert_eq!(select(RendererChoice::Auto, false).name(), "fallback");
        assert_eq!(select(RendererChoice::Plotters, false).name(), "fallback");
        assert_eq!(select(RendererChoice::Fallback, true).name(), "fallback");
    }

    #[cfg(feature = "plotters")]
    #[test]
    fn test_auto_prefers_plotters() {
        assert_eq!(probe(RendererChoice::Auto).name(), "plotters");
    }
}
