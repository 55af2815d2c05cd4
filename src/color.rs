// Copyright (c) 2026 rezky_nightky

use std::fmt;

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const HOT_PINK: Rgb = Rgb::new(0xff, 0x69, 0xb4);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba { rgb: self, a }
    }

    /// Parses `#RRGGBB`, `RRGGBB` or the short `#RGB` form.
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color: {} (expected #RRGGBB)", s));
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|e| e.to_string());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(format!("invalid color: {} (expected #RRGGBB)", s)),
        }
    }

    /// Every channel multiplied by `k` in `[0, 1]`.
    pub fn scaled(self, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::new(
            lerp_u8(0, self.r, k),
            lerp_u8(0, self.g, k),
            lerp_u8(0, self.b, k),
        )
    }

    /// Source-over blend of `top` onto `self` with coverage `t`.
    pub fn blend(self, top: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            lerp_u8(self.r, top.r, t),
            lerp_u8(self.g, top.g, t),
            lerp_u8(self.b, top.b, t),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Draw color with a separate alpha channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: u8,
}

impl Rgba {
    pub fn from_alpha_f32(rgb: Rgb, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        rgb.with_alpha(a)
    }

    pub fn opaque(rgb: Rgb) -> Self {
        rgb.with_alpha(u8::MAX)
    }

    pub fn alpha_f32(self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// The swatches offered by the color picker, in picker order.
pub const PRESETS: [(&str, Rgb); 18] = [
    ("hotpink", Rgb::HOT_PINK),
    ("matrix", Rgb::new(0x00, 0xff, 0x41)),
    ("azure", Rgb::new(0x00, 0x99, 0xff)),
    ("tangerine", Rgb::new(0xff, 0x6b, 0x35)),
    ("purple", Rgb::new(0xa8, 0x55, 0xf7)),
    ("amber", Rgb::new(0xf5, 0x9e, 0x0b)),
    ("red", Rgb::new(0xef, 0x44, 0x44)),
    ("emerald", Rgb::new(0x10, 0xb9, 0x81)),
    ("blue", Rgb::new(0x3b, 0x82, 0xf6)),
    ("violet", Rgb::new(0x8b, 0x5c, 0xf6)),
    ("orange", Rgb::new(0xf9, 0x73, 0x16)),
    ("cyan", Rgb::new(0x06, 0xb6, 0xd4)),
    ("lime", Rgb::new(0x84, 0xcc, 0x16)),
    ("pink", Rgb::new(0xec, 0x48, 0x99)),
    ("indigo", Rgb::new(0x63, 0x66, 0xf1)),
    ("teal", Rgb::new(0x14, 0xb8, 0xa6)),
    ("rose", Rgb::new(0xf4, 0x3f, 0x5e)),
    ("green", Rgb::new(0x22, 0xc5, 0x5e)),
];

/// Accepts a preset name (case-insensitive) or a hex color.
pub fn parse_color(s: &str) -> Result<Rgb, String> {
    let name = s.trim().to_ascii_lowercase();
    let name = match name.as_str() {
        "hot-pink" | "hot_pink" => "hotpink",
        other => other,
    };
    if let Some(&(_, rgb)) = PRESETS.iter().find(|(n, _)| *n == name) {
        return Ok(rgb);
    }
    Rgb::parse_hex(s).map_err(|_| format!("invalid color: {} (see --list-colors)", s))
}

pub fn preset_index(rgb: Rgb) -> Option<usize> {
    PRESETS.iter().position(|&(_, c)| c == rgb)
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;

    let (r6, g6, b6) = (level(c.r), level(c.g), level(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, Rgb::BLACK),
        239..=255 => (231, Rgb::WHITE),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, Rgb::new(v, v, v))
        }
    };

    if dist2(c, gray) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2(c, *rgb))
        .map(|&(color, _)| color)
        .unwrap_or(Color::White)
}

/// Terminal color for `c` in the given mode; `None` leaves the terminal's
/// default foreground in place.
pub fn terminal_color(c: Rgb, mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::Color16 => Some(rgb_to_color16(c)),
    }
}

pub fn background(mode: ColorMode, default_background: bool) -> Option<Color> {
    if default_background {
        return None;
    }
    Some(match mode {
        ColorMode::Color16 | ColorMode::Mono => Color::Black,
        ColorMode::TrueColor => Color::Rgb { r: 0, g: 0, b: 0 },
        ColorMode::Color256 => Color::AnsiValue(16),
    })
}
