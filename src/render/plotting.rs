// src/render/plotting.rs

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use super::{ChartRenderer, Surface};
use crate::chart::{
    geometry::{doughnut_slices, polar, ring_sector_points, value_range, DOUGHNUT_INNER_RATIO},
    theme::{self, coverage_color, Color as ThemeColor, BACKGROUND, GRID, TICK, TITLE},
    ChartKind, ChartOptions, ChartSpec,
};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn rgb(c: ThemeColor) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn title_style<'a>() -> TextStyle<'a> {
    ("sans-serif", 16)
        .into_font()
        .style(FontStyle::Bold)
        .color(&rgb(TITLE))
}

fn tick_style<'a>() -> TextStyle<'a> {
    ("sans-serif", 12).into_font().color(&rgb(TICK))
}

/// Label for a category axis position; positions between categories stay
/// blank.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Renders through the plotters SVG backend.
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn name(&self) -> &'static str {
        "plotters"
    }

    fn render(
        &self,
        surface: &mut Surface,
        kind: ChartKind,
        spec: &ChartSpec,
        options: &ChartOptions,
    ) -> Result<()> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (surface.width, surface.height))
                .into_drawing_area();
            root.fill(&rgb(BACKGROUND))?;
            let drawn = match kind {
                ChartKind::Line => draw_line(&root, spec, options),
                ChartKind::Bar => draw_bar(&root, spec, options),
                ChartKind::Doughnut => draw_doughnut(&root, spec, options),
            };
            drawn.with_context(|| format!("drawing {:?} chart on {}", kind, surface.id))?;
            root.present()
                .with_context(|| format!("presenting {}", surface.id))?;
        }
        surface.present(svg);
        Ok(())
    }
}

fn draw_line(root: &Area<'_>, spec: &ChartSpec, options: &ChartOptions) -> Result<()> {
    let (min, max) = value_range(&spec.series).unwrap_or((0.0, 1.0));
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    };
    let last = spec.labels.len().saturating_sub(1).max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, title_style())
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..last, lo..hi)?;

    let labels = &spec.labels;
    let x_fmt = |x: &f64| category_label(labels, *x);
    let y_fmt = |y: &f64| theme::lakhs(*y);
    chart
        .configure_mesh()
        .x_labels(labels.len().max(2))
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style(tick_style())
        .bold_line_style(rgb(GRID))
        .light_line_style(TRANSPARENT)
        .axis_style(rgb(GRID))
        .draw()?;

    for (idx, series) in spec.series.iter().enumerate() {
        let color = rgb(options.color(idx));
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i as f64, *v))
            .collect();

        if options.fill {
            chart.draw_series(AreaSeries::new(points.clone(), lo, color.mix(0.1)))?;
        }
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(3)))?
            .label(series.name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))?;
    }

    if !spec.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(rgb(BACKGROUND).mix(0.8))
            .border_style(rgb(GRID))
            .label_font(("sans-serif", 12).into_font().color(&rgb(TITLE)))
            .draw()?;
    }
    Ok(())
}

fn draw_bar(root: &Area<'_>, spec: &ChartSpec, options: &ChartOptions) -> Result<()> {
    let values: &[f64] = spec
        .series
        .first()
        .map(|s| s.values.as_slice())
        .unwrap_or(&[]);
    let bars: Vec<(u32, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as u32, *v))
        .collect();
    let max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let floor = bars.iter().map(|(_, v)| *v).fold(0.0, f64::min);
    let n = spec.labels.len().max(1) as u32;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, title_style())
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..n).into_segmented(), floor..(max + 1.0))?;

    let labels = &spec.labels;
    let x_fmt = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_fmt = |y: &f64| format!("{:.1}", y);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style(tick_style())
        .bold_line_style(rgb(GRID))
        .light_line_style(TRANSPARENT)
        .axis_style(rgb(GRID))
        .draw()?;

    let bar = |i: u32, v: f64, style: ShapeStyle| {
        let mut rect = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            style,
        );
        rect.set_margin(0, 0, 12, 12);
        rect
    };
    chart.draw_series(
        bars.iter()
            .map(|&(i, v)| bar(i, v, rgb(coverage_color(v)).mix(0.8).filled())),
    )?;
    chart.draw_series(
        bars.iter()
            .map(|&(i, v)| bar(i, v, rgb(coverage_color(v)).stroke_width(2))),
    )?;

    let value_style = ("sans-serif", 12)
        .into_font()
        .color(&rgb(TITLE))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().map(|&(i, v)| {
        Text::new(
            format!("{:.2}", v),
            (SegmentValue::CenterOf(i), v),
            value_style.clone(),
        )
    }))?;
    Ok(())
}

fn draw_doughnut(root: &Area<'_>, spec: &ChartSpec, options: &ChartOptions) -> Result<()> {
    let area = root.titled(&options.title, title_style())?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = (center.0.min(center.1) - 40.0).max(1.0);
    let inner = radius * DOUGHNUT_INNER_RATIO;

    let values: &[f64] = spec
        .series
        .first()
        .map(|s| s.values.as_slice())
        .unwrap_or(&[]);
    let to_px = |(x, y): (f64, f64)| (x.round() as i32, y.round() as i32);

    let label_style = ("sans-serif", 12)
        .into_font()
        .style(FontStyle::Bold)
        .color(&rgb(TITLE))
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (i, slice) in doughnut_slices(values).iter().enumerate() {
        let points: Vec<(i32, i32)> = ring_sector_points(center, radius, inner, slice)
            .into_iter()
            .map(to_px)
            .collect();
        area.draw(&Polygon::new(points, rgb(options.color(i)).filled()))?;

        let at = to_px(polar(center, (radius + inner) / 2.0, slice.mid_angle()));
        area.draw(&Text::new(slice.percent_label(), at, label_style.clone()))?;
    }

    let legend_style = ("sans-serif", 12).into_font().color(&rgb(TITLE));
    for (i, (label, value)) in spec.labels.iter().zip(values).enumerate() {
        let y = 20 + i as i32 * 20;
        area.draw(&Rectangle::new(
            [(20, y), (35, y + 10)],
            rgb(options.color(i)).filled(),
        ))?;
        area.draw(&Text::new(
            format!("{}: ₹{}L", label, theme::amount(*value)),
            (40, y),
            legend_style.clone(),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{
        theme::{DOUGHNUT_PALETTE, LINE_PALETTE},
        Series,
    };

    fn spec(labels: &[&str], series: &[(&str, &[f64])]) -> ChartSpec {
        ChartSpec {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            series: series
                .iter()
                .map(|(name, values)| Series {
                    name: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_category_label_only_on_whole_positions() {
        let labels = vec!["FY25".to_string(), "FY26".to_string()];
        assert_eq!(category_label(&labels, 1.0), "FY26");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 4.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn test_bar_svg_carries_both_covenant_colors() -> Result<()> {
        let mut surface = Surface::new("dscrChart", 640, 360);
        PlottersRenderer.render(
            &mut surface,
            ChartKind::Bar,
            &spec(&["FY25", "FY26"], &[("DSCR", &[0.9, 1.4])]),
            &ChartOptions::new("DSCR", &[]),
        )?;
        let svg = surface.svg().unwrap_or_default().to_lowercase();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#059669"));
        assert!(svg.contains("#f59e0b"));
        assert!(svg.contains("1.40"));
        Ok(())
    }

    #[test]
    fn test_line_and_doughnut_render() -> Result<()> {
        let mut surface = Surface::new("plChart", 640, 360);
        PlottersRenderer.render(
            &mut surface,
            ChartKind::Line,
            &spec(&["FY25", "FY26", "FY27"], &[("Revenue", &[100.0, 140.0, 190.0])]),
            &ChartOptions::new("Projections", &LINE_PALETTE).filled(),
        )?;
        assert!(surface.svg().unwrap_or_default().contains("Revenue"));

        let mut surface = Surface::new("machineryChart", 640, 360);
        PlottersRenderer.render(
            &mut surface,
            ChartKind::Doughnut,
            &spec(&["CNC", "Press"], &[("Cost", &[75.0, 25.0])]),
            &ChartOptions::new("Machinery", &DOUGHNUT_PALETTE),
        )?;
        let svg = surface.svg().unwrap_or_default();
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("25.0%"));
        Ok(())
    }

    #[test]
    fn test_non_finite_values_do_not_stall_rendering() -> Result<()> {
        let data = spec(
            &["FY26", "FY27", "FY28"],
            &[("DSCR", &[1.3, f64::INFINITY, -0.4])],
        );
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Doughnut] {
            let mut surface = Surface::new("dscrChart", 640, 360);
            PlottersRenderer.render(
                &mut surface,
                kind,
                &data,
                &ChartOptions::new("DSCR", &LINE_PALETTE).filled(),
            )?;
            assert!(!surface.svg().unwrap_or_default().contains("NaN"), "{kind:?}");
        }
        Ok(())
    }

    #[test]
    fn test_empty_spec_renders_blank_chart() -> Result<()> {
        let mut surface = Surface::new("balanceSheetChart", 320, 200);
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Doughnut] {
            PlottersRenderer.render(
                &mut surface,
                kind,
                &ChartSpec::default(),
                &ChartOptions::new("Empty", &LINE_PALETTE),
            )?;
        }
        assert_eq!(surface.paints(), 3);
        Ok(())
    }
}
