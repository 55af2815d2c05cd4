// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::color::{terminal_color, Rgb, Rgba};
use crate::frame::{Cell, Frame};
use crate::runtime::{is_zero_width, ColorMode};
use crate::surface::{Baseline, Glow, Surface, TextAlign, TextStyle};

/// Texels dimmer than this are treated as empty.
const VISIBLE_FLOOR: f32 = 0.04;

/// Mono terminals cannot dim, so a glyph is either shown or not.
const MONO_FLOOR: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Texel {
    ch: char,
    color: Rgb,
    intensity: f32,
    glow: bool,
}

impl Texel {
    const EMPTY: Texel = Texel {
        ch: ' ',
        color: Rgb::BLACK,
        intensity: 0.0,
        glow: false,
    };

    fn is_empty(&self) -> bool {
        self.ch == ' ' || self.intensity < VISIBLE_FLOOR
    }
}

/// Persistent drawing surface laid over the terminal grid.
///
/// Surface pixels map onto terminal cells: a cell is `cell_px / 2` pixels
/// wide and `cell_px` pixels tall, matching a monospace glyph of that size.
pub struct Canvas {
    cols: u16,
    rows: u16,
    col_px: f32,
    row_px: f32,
    texels: Vec<Texel>,
    style: TextStyle,
    glow: Option<Glow>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, cell_px: f32) -> Self {
        let cell_px = cell_px.max(2.0);
        Self {
            cols,
            rows,
            col_px: cell_px / 2.0,
            row_px: cell_px,
            texels: vec![Texel::EMPTY; cols as usize * rows as usize],
            style: TextStyle::default(),
            glow: None,
        }
    }

    #[allow(dead_code)]
    pub fn cols(&self) -> u16 {
        self.cols
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Pixel at the center of terminal cell `(col, row)`.
    #[allow(dead_code)]
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.col_px,
            (row as f32 + 0.5) * self.row_px,
        )
    }

    #[allow(dead_code)]
    pub fn glow_enabled(&self) -> bool {
        self.glow.is_some()
    }

    #[allow(dead_code)]
    pub fn glyph_at(&self, col: u16, row: u16) -> Option<char> {
        let t = self.texels.get(self.index(col, row)?)?;
        (!t.is_empty()).then_some(t.ch)
    }

    #[allow(dead_code)]
    pub fn intensity_at(&self, col: u16, row: u16) -> f32 {
        self.index(col, row)
            .and_then(|i| self.texels.get(i))
            .filter(|t| !t.is_empty())
            .map_or(0.0, |t| t.intensity)
    }

    pub fn clear(&mut self) {
        self.texels.fill(Texel::EMPTY);
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    fn column_of(&self, x: f32) -> i64 {
        (x / self.col_px).floor() as i64
    }

    fn row_of(&self, y: f32) -> i64 {
        (y / self.row_px).floor() as i64
    }

    /// Copies the canvas into `frame`, quantizing colors for the terminal.
    pub fn present(&self, frame: &mut Frame, mode: ColorMode, bg: Option<Color>) {
        for row in 0..self.rows.min(frame.height) {
            for col in 0..self.cols.min(frame.width) {
                let t = self.texels[row as usize * self.cols as usize + col as usize];
                let cell = if t.is_empty() || (mode == ColorMode::Mono && t.intensity < MONO_FLOOR)
                {
                    Cell::blank(bg)
                } else {
                    Cell {
                        ch: t.ch,
                        fg: terminal_color(t.color.scaled(t.intensity), mode),
                        bg,
                        bold: t.glow,
                    }
                };
                frame.set(col, row, cell);
            }
        }
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        (self.cols as f32 * self.col_px, self.rows as f32 * self.row_px)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if w <= 0.0 || h <= 0.0 || color.a == 0 {
            return;
        }
        let c0 = self.column_of(x).clamp(0, self.cols as i64) as usize;
        let c1 = ((x + w) / self.col_px).ceil().clamp(0.0, self.cols as f32) as usize;
        let r0 = self.row_of(y).clamp(0, self.rows as i64) as usize;
        let r1 = ((y + h) / self.row_px).ceil().clamp(0.0, self.rows as f32) as usize;
        let a = color.alpha_f32();
        let cols = self.cols as usize;

        for row in r0..r1 {
            for t in &mut self.texels[row * cols + c0..row * cols + c1] {
                if t.ch == ' ' {
                    continue;
                }
                if color.rgb == Rgb::BLACK {
                    t.intensity *= 1.0 - a;
                } else {
                    t.color = t.color.scaled(t.intensity).blend(color.rgb, a);
                    t.intensity = 1.0;
                }
                if t.intensity < VISIBLE_FLOOR {
                    *t = Texel::EMPTY;
                }
            }
        }
    }

    fn set_text_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow.filter(|g| g.blur > 0.0);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let glyphs: Vec<char> = text.chars().filter(|&c| !is_zero_width(c)).collect();
        if glyphs.is_empty() {
            return;
        }

        let row = match self.style.baseline {
            Baseline::Middle => self.row_of(y),
            Baseline::Top => self.row_of(y + self.style.size_px / 2.0),
        };
        if row < 0 || row >= self.rows as i64 {
            return;
        }
        let start = match self.style.align {
            TextAlign::Left => self.column_of(x),
            TextAlign::Center => {
                let half_width = glyphs.len() as f32 * self.col_px / 2.0;
                ((x - half_width) / self.col_px).round() as i64
            }
        };

        let a = color.alpha_f32();
        // glowing glyphs pick up a little of the halo color
        let (rgb, glow) = match self.glow {
            Some(g) if self.style.bold => (color.rgb.blend(g.color, 0.25), true),
            _ => (color.rgb, false),
        };
        for (i, ch) in glyphs.into_iter().enumerate() {
            let col = start + i as i64;
            if col < 0 || col >= self.cols as i64 || ch == ' ' {
                continue;
            }
            let idx = row as usize * self.cols as usize + col as usize;
            let t = &mut self.texels[idx];
            let under = if t.is_empty() { 0.0 } else { t.intensity };
            *t = Texel {
                ch,
                color: rgb,
                intensity: (a + under * (1.0 - a)).min(1.0),
                glow,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_bold() -> TextStyle {
        TextStyle {
            size_px: 18.0,
            bold: true,
            align: TextAlign::Center,
            baseline: Baseline::Middle,
        }
    }

    #[test]
    fn size_is_in_pixels() {
        let c = Canvas::new(40, 10, 18.0);
        assert_eq!(c.size(), (360.0, 180.0));
    }

    #[test]
    fn centered_text_straddles_anchor() {
        let mut c = Canvas::new(20, 4, 18.0);
        c.set_text_style(centered_bold());
        // anchor at the center of column 5
        let (x, y) = c.cell_center(5, 1);
        c.fill_text("abc", x, y, Rgba::opaque(Rgb::WHITE));
        assert_eq!(c.glyph_at(4, 1), Some('a'));
        assert_eq!(c.glyph_at(5, 1), Some('b'));
        assert_eq!(c.glyph_at(6, 1), Some('c'));
    }

    #[test]
    fn text_above_surface_is_clipped() {
        let mut c = Canvas::new(10, 4, 18.0);
        c.set_text_style(centered_bold());
        c.fill_text("Love", 45.0, -50.0, Rgba::opaque(Rgb::WHITE));
        assert!((0..4).all(|r| (0..10).all(|col| c.glyph_at(col, r).is_none())));
    }

    #[test]
    fn black_overlay_fades_until_empty() {
        let mut c = Canvas::new(4, 1, 18.0);
        c.fill_text("x", 0.0, 0.0, Rgba::opaque(Rgb::WHITE));
        let (w, h) = c.size();
        let trail = Rgba::from_alpha_f32(Rgb::BLACK, 0.05);

        c.fill_rect(0.0, 0.0, w, h, trail);
        let after_one = c.intensity_at(0, 0);
        assert!(after_one < 1.0 && after_one > 0.9);

        for _ in 0..200 {
            c.fill_rect(0.0, 0.0, w, h, trail);
        }
        assert_eq!(c.glyph_at(0, 0), None);
    }

    #[test]
    fn glow_needs_positive_blur() {
        let mut c = Canvas::new(2, 2, 18.0);
        c.set_glow(Some(Glow {
            blur: 0.0,
            color: Rgb::WHITE,
        }));
        assert!(!c.glow_enabled());
        c.set_glow(Some(Glow {
            blur: 15.0,
            color: Rgb::WHITE,
        }));
        assert!(c.glow_enabled());
    }

    #[test]
    fn present_scales_color_by_intensity() {
        let mut c = Canvas::new(2, 1, 18.0);
        c.fill_text("x", 0.0, 0.0, Rgb::new(200, 100, 0).with_alpha(128));
        let mut frame = Frame::new(2, 1, None);
        c.present(&mut frame, ColorMode::TrueColor, None);
        let cell = frame.get(0, 0).copied().expect("in bounds");
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.fg, Some(Color::Rgb { r: 100, g: 50, b: 0 }));
        assert_eq!(frame.get(1, 0).map(|c| c.ch), Some(' '));
    }

    #[test]
    fn mouse_cell_maps_to_pixel_center() {
        let c = Canvas::new(10, 10, 18.0);
        assert_eq!(c.cell_center(0, 0), (4.5, 9.0));
        assert_eq!(c.cell_center(3, 2), (31.5, 45.0));
    }
}
