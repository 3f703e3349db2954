// src/render/surface.rs

use anyhow::Result;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};
use tracing::{debug, error};

use super::ChartRenderer;
use crate::chart::{ChartKind, ChartOptions, ChartSpec};

/// A drawing target owned by the host. Each paint replaces the whole
/// document.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub id: String,
    pub width: u32,
    pub height: u32,
    svg: Option<String>,
    paints: usize,
}

impl Surface {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            svg: None,
            paints: 0,
        }
    }

    pub fn present(&mut self, svg: String) {
        self.svg = Some(svg);
        self.paints += 1;
    }

    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }

    pub fn paints(&self) -> usize {
        self.paints
    }
}

/// Host-side lookup of surfaces by logical id.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    surfaces: Arc<Mutex<BTreeMap<String, Surface>>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: &str, width: u32, height: u32) {
        self.lock()
            .insert(id.to_string(), Surface::new(id, width, height));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Surface> {
        self.lock().get(id).cloned()
    }

    /// Snapshot of every surface that has been painted at least once.
    pub fn painted(&self) -> Vec<Surface> {
        self.lock()
            .values()
            .filter(|s| s.svg.is_some())
            .cloned()
            .collect()
    }

    /// Paints `spec` onto surface `id`. An unknown id is logged and skipped;
    /// the return value says whether anything was drawn.
    pub fn paint(
        &self,
        id: &str,
        renderer: &dyn ChartRenderer,
        kind: ChartKind,
        spec: &ChartSpec,
        options: &ChartOptions,
    ) -> Result<bool> {
        let mut surfaces = self.lock();
        let Some(surface) = surfaces.get_mut(id) else {
            error!(surface = id, "Canvas {} not found", id);
            return Ok(false);
        };
        renderer.render(surface, kind, spec, options)?;
        debug!(surface = id, renderer = renderer.name(), "painted");
        Ok(true)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Surface>> {
        self.surfaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
