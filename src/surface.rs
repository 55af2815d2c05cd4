// Copyright (c) 2026 rezky_nightky

use crate::color::{Rgb, Rgba};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub bold: bool,
    pub align: TextAlign,
    pub baseline: Baseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 10.0,
            bold: false,
            align: TextAlign::Left,
            baseline: Baseline::Top,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: Rgb,
}

/// Axis-aligned rectangle in host ("client") coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (client_x - self.left, client_y - self.top)
    }
}

/// The 2D drawing context the renderer paints into.
///
/// Coordinates are surface-local pixels. Implementations keep whatever was
/// drawn until it is painted over; there is no clear operation.
pub trait Surface {
    fn size(&self) -> (f32, f32);

    /// Composites `color` over the rectangle with its alpha as coverage.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    fn set_text_style(&mut self, style: TextStyle);

    /// `None` or a zero blur turns the glow off.
    fn set_glow(&mut self, glow: Option<Glow>);

    /// Draws `text` anchored at `(x, y)` according to the current text style.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgba);
}
