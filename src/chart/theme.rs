// src/chart/theme.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// sRGB color with straight alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

pub const BACKGROUND: Color = Color::rgb(0x1e, 0x29, 0x3b);
pub const GRID: Color = Color::rgb(0x33, 0x41, 0x55);
pub const TITLE: Color = Color::rgb(0xf8, 0xfa, 0xfc);
pub const TICK: Color = Color::rgb(0xcb, 0xd5, 0xe1);

pub const TEAL: Color = Color::rgb(0x0d, 0x94, 0x88);
pub const BLUE: Color = Color::rgb(0x1e, 0x40, 0xaf);
pub const GREEN: Color = Color::rgb(0x05, 0x96, 0x69);
pub const AMBER: Color = Color::rgb(0xf5, 0x9e, 0x0b);
pub const RED: Color = Color::rgb(0xdc, 0x26, 0x26);
pub const VIOLET: Color = Color::rgb(0x8b, 0x5c, 0xf6);

/// Standard debt-service-coverage covenant: at or above is a pass.
pub const DSCR_THRESHOLD: f64 = 1.25;
pub const DSCR_PASS: Color = GREEN;
pub const DSCR_WARNING: Color = AMBER;

pub const LINE_PALETTE: [Color; 3] = [TEAL, BLUE, GREEN];
pub const BALANCE_SHEET_PALETTE: [Color; 3] = [TEAL, BLUE, RED];
pub const DOUGHNUT_PALETTE: [Color; 6] = [TEAL, BLUE, GREEN, AMBER, RED, VIOLET];

/// Color for the `index`th series; indexes past the palette reuse the first
/// entry.
pub fn pick(palette: &[Color], index: usize) -> Color {
    palette
        .get(index)
        .or_else(|| palette.first())
        .copied()
        .unwrap_or(TEAL)
}

/// Bar color under the DSCR covenant rule.
pub fn coverage_color(value: f64) -> Color {
    if value >= DSCR_THRESHOLD {
        DSCR_PASS
    } else {
        DSCR_WARNING
    }
}

/// Amount in lakhs with the rupee prefix, e.g. `₹1450L`.
pub fn lakhs(value: f64) -> String {
    format!("₹{}L", value.round() as i64)
}

/// Raw figure as the data file wrote it, e.g. `40` or `12.5`.
pub fn amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
