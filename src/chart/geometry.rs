// src/chart/geometry.rs
//
// Pure layout math shared by both renderers.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::Series;

/// Ring thickness of every doughnut: inner radius over outer radius.
pub const DOUGHNUT_INNER_RATIO: f64 = 0.6;

/// Doughnut slices begin at twelve o'clock.
pub const DOUGHNUT_START: f64 = -FRAC_PI_2;

/// Common vertical scale across every series combined. Non-finite values
/// are ignored; `None` when no finite value remains.
pub fn value_range(series: &[Series]) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// One doughnut slice. Angles are radians in screen space, where positive
/// sweep runs clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start: f64,
    pub sweep: f64,
    pub fraction: f64,
}

impl Slice {
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    pub fn mid_angle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }

    /// `value / total` with one decimal, e.g. `40.0%`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// Lays out slices in input order starting from the top. Non-finite values
/// count as zero; a non-positive total yields zero-sweep slices.
pub fn doughnut_slices(values: &[f64]) -> Vec<Slice> {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    let total = values.iter().fold(0.0, |acc, &v| acc + finite(v));
    let mut angle = DOUGHNUT_START;
    values
        .iter()
        .map(|&value| {
            let fraction = if total > 0.0 { finite(value) / total } else { 0.0 };
            let slice = Slice {
                start: angle,
                sweep: fraction * TAU,
                fraction,
            };
            angle += slice.sweep;
            slice
        })
        .collect()
}

/// Point at `angle` on a circle of `radius` around `center`.
pub fn polar(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    (
        center.0 + angle.cos() * radius,
        center.1 + angle.sin() * radius,
    )
}

/// Polygon approximation of a ring sector, outer arc first then the inner
/// arc back. Used where the backend has no native arc primitive.
pub fn ring_sector_points(
    center: (f64, f64),
    outer: f64,
    inner: f64,
    slice: &Slice,
) -> Vec<(f64, f64)> {
    let steps = ((slice.sweep.abs() / TAU) * 120.0).ceil().max(1.0) as usize;
    let at = |i: usize| slice.start + slice.sweep * i as f64 / steps as f64;

    let mut points: Vec<(f64, f64)> = (0..=steps).map(|i| polar(center, outer, at(i))).collect();
    points.extend((0..=steps).rev().map(|i| polar(center, inner, at(i))));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, values: &[f64]) -> Series {
        Series {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_range_spans_all_series() {
        let data = [series("a", &[10.0, 20.0, 30.0]), series("b", &[5.0, 50.0, 15.0])];
        assert_eq!(value_range(&data), Some((5.0, 50.0)));
        assert_eq!(value_range(&[]), None);
        assert_eq!(value_range(&[series("empty", &[])]), None);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let data = [series("a", &[1.3, f64::INFINITY, f64::NAN, 0.9])];
        assert_eq!(value_range(&data), Some((0.9, 1.3)));
        assert_eq!(value_range(&[series("inf", &[f64::INFINITY])]), None);

        let slices = doughnut_slices(&[30.0, f64::INFINITY, 10.0]);
        let labels: Vec<String> = slices.iter().map(Slice::percent_label).collect();
        assert_eq!(labels, vec!["75.0%", "0.0%", "25.0%"]);
    }

    #[test]
    fn test_doughnut_percentages_and_closure() {
        let slices = doughnut_slices(&[40.0, 30.0, 20.0, 10.0]);
        let labels: Vec<String> = slices.iter().map(Slice::percent_label).collect();
        assert_eq!(labels, vec!["40.0%", "30.0%", "20.0%", "10.0%"]);

        assert!((slices[0].start.to_degrees() - -90.0).abs() < 1e-9);
        for pair in slices.windows(2) {
            assert!((pair[0].end() - pair[1].start).abs() < 1e-12);
        }
        let swept: f64 = slices.iter().map(|s| s.sweep.to_degrees()).sum();
        assert!((swept - 360.0).abs() < 1e-9);
        let last_end = slices.last().map(Slice::end).unwrap_or_default();
        assert!((last_end - (DOUGHNUT_START + TAU)).abs() < 1e-9);
    }

    #[test]
    fn test_doughnut_zero_total() {
        let slices = doughnut_slices(&[0.0, 0.0]);
        assert!(slices.iter().all(|s| s.sweep == 0.0));
        assert_eq!(slices[0].percent_label(), "0.0%");
    }

    #[test]
    fn test_ring_sector_closes_on_inner_arc() {
        let slice = doughnut_slices(&[1.0, 3.0])[0];
        let pts = ring_sector_points((0.0, 0.0), 10.0, 6.0, &slice);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        // top of the outer ring, then top of the inner ring
        assert!((first.0).abs() < 1e-9 && (first.1 + 10.0).abs() < 1e-9);
        assert!((last.0).abs() < 1e-9 && (last.1 + 6.0).abs() < 1e-9);
    }
}
