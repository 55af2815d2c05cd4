// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::color::Rgb;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;
pub const DEFAULT_SPEED: u8 = 10;
pub const DEFAULT_MESSAGE: &str = "Te Amo ❤️";
pub const FALLBACK_MESSAGE: &str = "Love";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// Per-frame snapshot of the user-facing parameters. The animation core only
/// ever reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub speed: i32,
    pub color: Rgb,
    pub message: String,
}

impl Style {
    pub fn new(speed: i32, color: Rgb, message: impl Into<String>) -> Self {
        Self {
            speed,
            color,
            message: message.into(),
        }
    }

    /// Text drawn by every drop; never empty.
    pub fn display_text(&self) -> &str {
        if self.message.is_empty() {
            FALLBACK_MESSAGE
        } else {
            &self.message
        }
    }

    /// Visible glyphs of the display text, in order. Zero-width joiners and
    /// variation selectors attach to the previous glyph and are dropped.
    pub fn glyphs(&self) -> Vec<char> {
        let glyphs: Vec<char> = self
            .display_text()
            .chars()
            .filter(|&c| !is_zero_width(c))
            .collect();
        if glyphs.is_empty() {
            FALLBACK_MESSAGE.chars().collect()
        } else {
            glyphs
        }
    }

    /// Dimensionless drop velocity scale; the default speed of 10 gives 2.
    pub fn speed_factor(&self) -> f32 {
        self.speed as f32 / 5.0
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED as i32, Rgb::HOT_PINK, DEFAULT_MESSAGE)
    }
}

/// `1000 / max(speed, 1)` milliseconds.
pub fn tick_interval(speed: i32) -> Duration {
    let rate = speed.max(1) as u64;
    Duration::from_nanos(1_000_000_000 / rate)
}

pub fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200F}' | '\u{FE00}'..='\u{FE0F}' | '\u{20E3}')
        || c.is_control()
}
