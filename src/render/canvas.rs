// src/render/canvas.rs
//
// Immediate-mode 2D drawing target. Draw calls are recorded in order and
// serialized to a standalone SVG document.

use std::f64::consts::PI;
use std::fmt::Write as _;

use crate::chart::{geometry::polar, theme::Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub anchor: Anchor,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            size,
            bold: false,
            anchor: Anchor::Start,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: Color,
        width: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        color: Color,
    },
    RingSector {
        center: (f64, f64),
        outer: f64,
        inner: f64,
        start: f64,
        end: f64,
        color: Color,
    },
    Text {
        text: String,
        at: (f64, f64),
        style: TextStyle,
    },
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width as f64
    }

    pub fn height(&self) -> f64 {
        self.height as f64
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drops everything drawn so far and paints the whole surface.
    pub fn clear(&mut self, background: Color) {
        self.ops.clear();
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0.0, 0.0, w, h, background);
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    pub fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
        self.stroke_polyline(vec![from, to], color, width);
    }

    pub fn stroke_polyline(&mut self, points: Vec<(f64, f64)>, color: Color, width: f64) {
        if points.len() < 2 {
            return;
        }
        self.ops.push(DrawOp::Polyline {
            points,
            color,
            width,
        });
    }

    pub fn fill_polygon(&mut self, points: Vec<(f64, f64)>, color: Color) {
        if points.len() < 3 {
            return;
        }
        self.ops.push(DrawOp::Polygon { points, color });
    }

    pub fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    /// Fills the ring between `inner` and `outer` from `start` to `end`
    /// radians, clockwise on screen.
    pub fn fill_ring_sector(
        &mut self,
        center: (f64, f64),
        outer: f64,
        inner: f64,
        start: f64,
        end: f64,
        color: Color,
    ) {
        self.ops.push(DrawOp::RingSector {
            center,
            outer,
            inner,
            start,
            end,
            color,
        });
    }

    pub fn fill_text(&mut self, text: impl Into<String>, at: (f64, f64), style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.into(),
            at,
            style,
        });
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for op in &self.ops {
            write_op(&mut out, op);
        }
        out.push_str("</svg>\n");
        out
    }
}

fn svg_points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fill_attr(color: &Color) -> String {
    if color.a < 1.0 {
        format!(r#"fill="{}" fill-opacity="{:.2}""#, color.hex(), color.a)
    } else {
        format!(r#"fill="{}""#, color.hex())
    }
}

fn write_op(out: &mut String, op: &DrawOp) {
    match op {
        DrawOp::Rect { x, y, w, h, color } => {
            let _ = write!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
                x,
                y,
                w,
                h,
                fill_attr(color)
            );
        }
        DrawOp::Polyline {
            points,
            color,
            width,
        } => {
            let _ = write!(
                out,
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
                svg_points(points),
                color.hex(),
                width
            );
        }
        DrawOp::Polygon { points, color } => {
            let _ = write!(
                out,
                r#"<polygon points="{}" {}/>"#,
                svg_points(points),
                fill_attr(color)
            );
        }
        DrawOp::Circle {
            center,
            radius,
            color,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
                center.0,
                center.1,
                radius,
                fill_attr(color)
            );
        }
        DrawOp::RingSector {
            center,
            outer,
            inner,
            start,
            end,
            color,
        } => {
            if end - start <= 0.0 {
                return;
            }
            let _ = write!(
                out,
                r#"<path d="{}" {}/>"#,
                ring_sector_path(*center, *outer, *inner, *start, *end),
                fill_attr(color)
            );
        }
        DrawOp::Text { text, at, style } => {
            let _ = write!(
                out,
                r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{}"{} text-anchor="{}" {}>{}</text>"#,
                at.0,
                at.1,
                style.size,
                if style.bold { r#" font-weight="bold""# } else { "" },
                style.anchor.svg(),
                fill_attr(&style.color),
                escape(text)
            );
        }
    }
}

/// SVG path for a ring sector. Arcs are split at their midpoint when longer
/// than a half turn so a full ring still renders.
fn ring_sector_path(center: (f64, f64), outer: f64, inner: f64, start: f64, end: f64) -> String {
    let mut angles = vec![start];
    if end - start > PI {
        angles.push((start + end) / 2.0);
    }
    angles.push(end);

    let mut d = String::new();
    let p = polar(center, outer, start);
    let _ = write!(d, "M{:.2},{:.2}", p.0, p.1);
    for a in &angles[1..] {
        let p = polar(center, outer, *a);
        let _ = write!(d, " A{:.2},{:.2} 0 0 1 {:.2},{:.2}", outer, outer, p.0, p.1);
    }
    let p = polar(center, inner, end);
    let _ = write!(d, " L{:.2},{:.2}", p.0, p.1);
    for a in angles.iter().rev().skip(1) {
        let p = polar(center, inner, *a);
        let _ = write!(d, " A{:.2},{:.2} 0 0 0 {:.2},{:.2}", inner, inner, p.0, p.1);
    }
    d.push_str(" Z");
    d
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
