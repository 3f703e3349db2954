// src/render/simple.rs

use anyhow::Result;

use super::{
    canvas::{Anchor, Canvas, TextStyle},
    ChartRenderer, Surface,
};
use crate::chart::{
    geometry::{doughnut_slices, polar, value_range, DOUGHNUT_INNER_RATIO},
    theme::{self, coverage_color, lakhs, BACKGROUND, GRID, TICK, TITLE},
    ChartKind, ChartOptions, ChartSpec,
};

const PADDING: f64 = 60.0;
/// Number of intervals between horizontal grid lines.
const GRID_ROWS: usize = 5;

/// Minimal chart drawer bound to one surface and one chart kind. Every
/// `draw*` call repaints the surface from scratch.
pub struct SimpleChart<'a> {
    surface: &'a mut Surface,
    kind: ChartKind,
    canvas: Canvas,
}

impl<'a> SimpleChart<'a> {
    pub fn new(surface: &'a mut Surface, kind: ChartKind) -> Self {
        let canvas = Canvas::new(surface.width, surface.height);
        Self {
            surface,
            kind,
            canvas,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn draw(&mut self, spec: &ChartSpec, options: &ChartOptions) {
        match self.kind {
            ChartKind::Line => self.draw_line(spec, options),
            ChartKind::Bar => self.draw_bar(spec, options),
            ChartKind::Doughnut => self.draw_doughnut(spec, options),
        }
    }

    pub fn draw_line(&mut self, spec: &ChartSpec, options: &ChartOptions) {
        self.begin(&options.title);
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let chart_w = w - PADDING * 2.0;
        let chart_h = h - PADDING * 2.0;

        let (min, max) = value_range(&spec.series).unwrap_or((0.0, 0.0));
        let range = if max > min { max - min } else { 1.0 };

        let n = spec.labels.len();
        let x_at = |i: usize| {
            if n > 1 {
                PADDING + i as f64 * chart_w / (n - 1) as f64
            } else {
                PADDING + chart_w / 2.0
            }
        };
        let y_at = |v: f64| PADDING + chart_h - (v - min) / range * chart_h;

        for i in 0..n {
            let x = x_at(i);
            self.canvas
                .stroke_line((x, PADDING), (x, h - PADDING), GRID, 1.0);
        }
        self.horizontal_grid(chart_h);

        let tick = TextStyle::new(12.0, TICK).anchor(Anchor::Middle);
        for (i, label) in spec.labels.iter().enumerate() {
            self.canvas.fill_text(label.as_str(), (x_at(i), h - 10.0), tick);
        }
        let y_tick = tick.anchor(Anchor::End);
        for i in 0..=GRID_ROWS {
            let value = min + range * (GRID_ROWS - i) as f64 / GRID_ROWS as f64;
            let y = PADDING + i as f64 * chart_h / GRID_ROWS as f64;
            self.canvas
                .fill_text(lakhs(value), (PADDING - 10.0, y + 5.0), y_tick);
        }

        for (idx, series) in spec.series.iter().enumerate() {
            let color = options.color(idx);
            let points: Vec<(f64, f64)> = series
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, v)| (x_at(i), y_at(*v)))
                .collect();
            if options.fill && points.len() > 1 {
                let mut area = points.clone();
                area.push((points[points.len() - 1].0, PADDING + chart_h));
                area.push((points[0].0, PADDING + chart_h));
                self.canvas.fill_polygon(area, color.with_alpha(0.1));
            }
            self.canvas.stroke_polyline(points.clone(), color, 3.0);
            for p in points {
                self.canvas.fill_circle(p, 4.0, color);
            }
        }

        let names: Vec<String> = spec.series.iter().map(|s| s.name.clone()).collect();
        self.legend(50.0, &names, options);
        self.finish();
    }

    /// Draws the first series only, coloring each bar by the coverage
    /// covenant.
    pub fn draw_bar(&mut self, spec: &ChartSpec, options: &ChartOptions) {
        self.begin(&options.title);
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let chart_w = w - PADDING * 2.0;
        let chart_h = h - PADDING * 2.0;

        let values: &[f64] = spec.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
        let max = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        let max = if max > 0.0 { max } else { 1.0 };

        self.horizontal_grid(chart_h);

        let n = spec.labels.len().max(1) as f64;
        let slot = chart_w / n;
        let bar_w = slot * 0.6;
        let value_style = TextStyle::new(12.0, TITLE).anchor(Anchor::Middle);
        for (i, value) in values.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let x = PADDING + i as f64 * slot + (slot - bar_w) / 2.0;
            // negative values hang below the baseline
            let bar_h = value / max * chart_h;
            let y = h - PADDING - bar_h.max(0.0);
            self.canvas
                .fill_rect(x, y, bar_w, bar_h.abs(), coverage_color(*value));
            self.canvas
                .fill_text(format!("{:.2}", value), (x + bar_w / 2.0, y - 5.0), value_style);
        }

        let tick = TextStyle::new(12.0, TICK).anchor(Anchor::Middle);
        for (i, label) in spec.labels.iter().enumerate() {
            let x = PADDING + i as f64 * slot + slot / 2.0;
            self.canvas.fill_text(label.as_str(), (x, h - 10.0), tick);
        }
        let y_tick = tick.anchor(Anchor::End);
        for i in 0..=GRID_ROWS {
            let value = max * (GRID_ROWS - i) as f64 / GRID_ROWS as f64;
            let y = PADDING + i as f64 * chart_h / GRID_ROWS as f64;
            self.canvas
                .fill_text(format!("{:.1}", value), (PADDING - 10.0, y + 5.0), y_tick);
        }
        self.finish();
    }

    pub fn draw_doughnut(&mut self, spec: &ChartSpec, options: &ChartOptions) {
        self.begin(&options.title);
        let center = (self.canvas.width() / 2.0, self.canvas.height() / 2.0);
        let radius = (center.0.min(center.1) - 100.0).max(1.0);
        let inner = radius * DOUGHNUT_INNER_RATIO;

        let values: &[f64] = spec.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
        let label_style = TextStyle::new(12.0, TITLE).bold().anchor(Anchor::Middle);
        for (i, slice) in doughnut_slices(values).iter().enumerate() {
            self.canvas.fill_ring_sector(
                center,
                radius,
                inner,
                slice.start,
                slice.end(),
                options.color(i),
            );
            let at = polar(center, (radius + inner) / 2.0, slice.mid_angle());
            self.canvas.fill_text(slice.percent_label(), at, label_style);
        }

        let entries: Vec<String> = spec
            .labels
            .iter()
            .zip(values)
            .map(|(label, value)| format!("{}: ₹{}L", label, theme::amount(*value)))
            .collect();
        self.legend(60.0, &entries, options);
        self.finish();
    }

    fn begin(&mut self, title: &str) {
        self.canvas.clear(BACKGROUND);
        if !title.is_empty() {
            let style = TextStyle::new(16.0, TITLE).bold().anchor(Anchor::Middle);
            let x = self.canvas.width() / 2.0;
            self.canvas.fill_text(title, (x, 30.0), style);
        }
    }

    fn horizontal_grid(&mut self, chart_h: f64) {
        let right = self.canvas.width() - PADDING;
        for i in 0..=GRID_ROWS {
            let y = PADDING + i as f64 * chart_h / GRID_ROWS as f64;
            self.canvas.stroke_line((PADDING, y), (right, y), GRID, 1.0);
        }
    }

    fn legend(&mut self, top: f64, entries: &[String], options: &ChartOptions) {
        let style = TextStyle::new(12.0, TITLE);
        for (i, entry) in entries.iter().enumerate() {
            let y = top + i as f64 * 20.0;
            self.canvas.fill_rect(20.0, y, 15.0, 10.0, options.color(i));
            self.canvas.fill_text(entry.as_str(), (40.0, y + 8.0), style);
        }
    }

    fn finish(&mut self) {
        self.surface.present(self.canvas.to_svg());
    }
}

/// Renderer backed by [`SimpleChart`].
pub struct FallbackRenderer;

impl ChartRenderer for FallbackRenderer {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn render(
        &self,
        surface: &mut Surface,
        kind: ChartKind,
        spec: &ChartSpec,
        options: &ChartOptions,
    ) -> Result<()> {
        SimpleChart::new(surface, kind).draw(spec, options);
        Ok(())
    }
}
