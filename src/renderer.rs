// Copyright (c) 2026 rezky_nightky

use crate::color::{Rgb, Rgba};
use crate::drops::DropField;
use crate::particles::ParticleField;
use crate::runtime::Style;
use crate::surface::{Baseline, Glow, Surface, TextAlign, TextStyle};

pub const FONT_SIZE: f32 = 18.0;
pub const GLOW_BLUR: f32 = 15.0;
pub const TRAIL_ALPHA: f32 = 0.05;

/// Paints one frame of the effect and advances both fields.
pub struct Renderer {
    font: TextStyle,
    trail: Rgba,
    glow_blur: f32,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            font: TextStyle {
                size_px: FONT_SIZE,
                bold: true,
                align: TextAlign::Center,
                baseline: Baseline::Middle,
            },
            trail: Rgba::from_alpha_f32(Rgb::BLACK, TRAIL_ALPHA),
            glow_blur: GLOW_BLUR,
        }
    }

    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        drops: &mut DropField,
        particles: &mut ParticleField,
        style: &Style,
    ) {
        let (w, h) = surface.size();
        surface.fill_rect(0.0, 0.0, w, h, self.trail);

        let ink = Rgba::opaque(style.color);
        surface.set_text_style(self.font);
        surface.set_glow(Some(Glow {
            blur: self.glow_blur,
            color: style.color,
        }));

        let text = style.display_text();
        let half_cell = drops.cell_size() / 2.0;
        let factor = style.speed_factor();
        for i in 0..drops.len() {
            let d = drops.drops()[i];
            surface.fill_text(text, d.x + half_cell, d.y, ink);
            drops.advance(i, factor);
        }

        if !particles.is_empty() {
            let glyphs = style.glyphs();
            let mut buf = [0u8; 4];
            for (i, p) in particles.particles().iter().enumerate() {
                let ch = glyphs[i % glyphs.len()];
                let color = style.color.with_alpha(p.alpha());
                surface.fill_text(ch.encode_utf8(&mut buf), p.x, p.y, color);
            }
            particles.advance_and_prune();
        }

        surface.set_glow(None);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::particles::{BURST_SIZE, DEFAULT_MAX_PARTICLES, PARTICLE_LIFE};

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Op {
        Fill(Rgba),
        Style(TextStyle),
        Glow(Option<f32>),
        Text(String, f32, f32, Rgba),
    }

    /// Surface that records every call instead of drawing.
    pub(crate) struct Recorder {
        pub(crate) size: (f32, f32),
        pub(crate) ops: Vec<Op>,
    }

    impl Recorder {
        pub(crate) fn new(w: f32, h: f32) -> Self {
            Self {
                size: (w, h),
                ops: Vec::new(),
            }
        }

        pub(crate) fn texts(&self) -> Vec<(String, f32, f32, Rgba)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(s, x, y, c) => Some((s.clone(), *x, *y, *c)),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> (f32, f32) {
            self.size
        }

        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, color: Rgba) {
            self.ops.push(Op::Fill(color));
        }

        fn set_text_style(&mut self, style: TextStyle) {
            self.ops.push(Op::Style(style));
        }

        fn set_glow(&mut self, glow: Option<Glow>) {
            self.ops.push(Op::Glow(glow.map(|g| g.blur)));
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgba) {
            self.ops.push(Op::Text(text.to_string(), x, y, color));
        }
    }

    fn fields(w: f32, h: f32) -> (DropField, ParticleField) {
        let mut drops = DropField::with_rng(StdRng::seed_from_u64(21));
        drops.initialize(w, h, FONT_SIZE);
        let particles = ParticleField::with_rng(DEFAULT_MAX_PARTICLES, StdRng::seed_from_u64(22));
        (drops, particles)
    }

    #[test]
    fn frame_is_painted_in_order() {
        let (mut drops, mut particles) = fields(54.0, 200.0);
        particles.spawn_burst(10.0, 10.0);
        let mut s = Recorder::new(54.0, 200.0);
        let style = Style::new(10, Rgb::HOT_PINK, "ab");

        Renderer::new().render(&mut s, &mut drops, &mut particles, &style);

        assert_eq!(s.ops[0], Op::Fill(Rgb::BLACK.with_alpha(13)));
        assert!(matches!(s.ops[1], Op::Style(t) if t.bold && t.align == TextAlign::Center
            && t.baseline == Baseline::Middle && t.size_px == FONT_SIZE));
        assert_eq!(s.ops[2], Op::Glow(Some(GLOW_BLUR)));
        assert_eq!(s.ops.last(), Some(&Op::Glow(None)));
        assert_eq!(s.texts().len(), 3 + BURST_SIZE);
    }

    #[test]
    fn drops_draw_message_centered_in_column() {
        let (mut drops, mut particles) = fields(54.0, 200.0);
        let before: Vec<_> = drops.drops().to_vec();
        let mut s = Recorder::new(54.0, 200.0);
        let style = Style::new(10, Rgb::HOT_PINK, "Hola");

        Renderer::new().render(&mut s, &mut drops, &mut particles, &style);

        let texts = s.texts();
        for (d, (text, x, y, color)) in before.iter().zip(&texts) {
            assert_eq!(text, "Hola");
            assert_eq!(*x, d.x + 9.0);
            assert_eq!(*y, d.y);
            assert_eq!(*color, Rgba::opaque(Rgb::HOT_PINK));
        }
    }

    #[test]
    fn empty_message_uses_fallback_everywhere() {
        let (mut drops, mut particles) = fields(36.0, 100.0);
        particles.spawn_burst(0.0, 0.0);
        let mut s = Recorder::new(36.0, 100.0);
        let style = Style::new(10, Rgb::HOT_PINK, "");

        Renderer::new().render(&mut s, &mut drops, &mut particles, &style);

        let texts = s.texts();
        assert_eq!(texts[0].0, "Love");
        assert_eq!(texts[1].0, "Love");
        let particle_glyphs: String = texts[2..6].iter().map(|t| t.0.as_str()).collect();
        assert_eq!(particle_glyphs, "Love");
    }

    #[test]
    fn particles_cycle_message_glyphs_with_fading_alpha() {
        let (mut drops, mut particles) = fields(0.0, 100.0);
        particles.spawn_burst(50.0, 50.0);
        let style = Style::new(10, Rgb::new(1, 2, 3), "xyz");
        let renderer = Renderer::new();

        let mut s = Recorder::new(0.0, 100.0);
        renderer.render(&mut s, &mut drops, &mut particles, &style);
        let texts = s.texts();
        assert_eq!(texts[0].0, "x");
        assert_eq!(texts[1].0, "y");
        assert_eq!(texts[2].0, "z");
        assert_eq!(texts[3].0, "x");
        assert!(texts.iter().all(|t| t.3 == Rgb::new(1, 2, 3).with_alpha(255)));

        let mut s = Recorder::new(0.0, 100.0);
        renderer.render(&mut s, &mut drops, &mut particles, &style);
        let expected = ((PARTICLE_LIFE - 1) as f32 / PARTICLE_LIFE as f32 * 255.0).round() as u8;
        assert!(s.texts().iter().all(|t| t.3.a == expected));
    }

    #[test]
    fn dead_particles_are_never_drawn() {
        let (mut drops, mut particles) = fields(0.0, 100.0);
        particles.spawn_burst(50.0, 50.0);
        let style = Style::default();
        let renderer = Renderer::new();
        let mut drawn = 0;
        for _ in 0..PARTICLE_LIFE + 5 {
            let mut s = Recorder::new(0.0, 100.0);
            renderer.render(&mut s, &mut drops, &mut particles, &style);
            assert!(s.texts().iter().all(|t| t.3.a > 0));
            drawn += s.texts().len();
        }
        assert_eq!(drawn, BURST_SIZE * PARTICLE_LIFE as usize);
        assert!(particles.is_empty());
    }
}
