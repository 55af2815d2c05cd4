// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::drops::DropField;
use crate::interaction::{InteractionHandler, Pointer};
use crate::particles::ParticleField;
use crate::renderer::Renderer;
use crate::runtime::Style;
use crate::scheduler::FrameScheduler;
use crate::surface::{Surface, SurfaceRect};

/// The animation core: both fields, the renderer and the tick gate.
///
/// The host feeds it frame opportunities, resizes and clicks from a single
/// thread; every mutation happens between ticks.
pub struct Animation {
    drops: DropField,
    particles: ParticleField,
    renderer: Renderer,
    scheduler: FrameScheduler,
    interaction: InteractionHandler,
    cell_size: f32,
    surface_size: (f32, f32),
    animating: bool,
    ticks: u64,
}

impl Animation {
    pub fn new(cell_size: f32, max_particles: usize) -> Self {
        Self::with_fields(
            DropField::new(),
            ParticleField::new(max_particles),
            cell_size,
        )
    }

    pub fn with_fields(drops: DropField, particles: ParticleField, cell_size: f32) -> Self {
        Self {
            drops,
            particles,
            renderer: Renderer::new(),
            scheduler: FrameScheduler::new(),
            interaction: InteractionHandler::new(SurfaceRect::new(0.0, 0.0, 0.0, 0.0)),
            cell_size,
            surface_size: (0.0, 0.0),
            animating: true,
            ticks: 0,
        }
    }

    #[allow(dead_code)]
    pub fn drops(&self) -> &DropField {
        &self.drops
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn set_animating(&mut self, on: bool) {
        if self.animating != on {
            log::info!("animation {}", if on { "resumed" } else { "paused" });
        }
        self.animating = on;
    }

    /// New surface geometry: the drop field is rebuilt from scratch.
    pub fn resize(&mut self, bounds: SurfaceRect) {
        self.surface_size = (bounds.width, bounds.height);
        self.interaction.set_bounds(bounds);
        self.drops
            .initialize(bounds.width, bounds.height, self.cell_size);
        log::debug!(
            "surface {}x{} px, {} columns",
            bounds.width,
            bounds.height,
            self.drops.len()
        );
    }

    /// Re-seeds every drop and drops all live particles.
    pub fn reset(&mut self) {
        let (w, h) = self.surface_size;
        self.drops.initialize(w, h, self.cell_size);
        self.particles.clear();
        log::info!("fields reset");
    }

    pub fn click(&mut self, pointer: Pointer) {
        self.interaction.click(pointer, &mut self.particles);
    }

    /// One frame opportunity at monotonic time `now`. Renders and returns
    /// true when the tick gate for `style.speed` is open; a missing surface
    /// skips the tick without consuming it.
    pub fn frame<S: Surface + ?Sized>(
        &mut self,
        now: Duration,
        surface: Option<&mut S>,
        style: &Style,
    ) -> bool {
        if !self.animating || !self.scheduler.is_due(now, style.speed) {
            return false;
        }
        let Some(surface) = surface else {
            log::trace!("no surface at {:?}, tick skipped", now);
            return false;
        };

        self.renderer
            .render(surface, &mut self.drops, &mut self.particles, style);
        self.scheduler.commit(now);
        self.ticks += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::canvas::Canvas;
    use crate::color::Rgb;
    use crate::particles::{BURST_SIZE, PARTICLE_LIFE};
    use crate::renderer::tests::Recorder;

    fn animation(max_particles: usize) -> Animation {
        Animation::with_fields(
            DropField::with_rng(StdRng::seed_from_u64(7)),
            ParticleField::with_rng(max_particles, StdRng::seed_from_u64(8)),
            18.0,
        )
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn end_to_end_burst_lifecycle() {
        let mut a = animation(2000);
        a.resize(SurfaceRect::new(0.0, 0.0, 360.0, 200.0));
        assert_eq!(a.drops().len(), 20);

        let style = Style::new(10, Rgb::HOT_PINK, "");
        let mut surface = Recorder::new(360.0, 200.0);
        let mut now = ms(100);
        assert!(a.frame(now, Some(&mut surface), &style));
        assert!(surface.texts().iter().take(20).all(|t| t.0 == "Love"));

        a.click(Pointer {
            client_x: 100.0,
            client_y: 50.0,
        });
        assert_eq!(a.particles().len(), BURST_SIZE);

        for _ in 0..PARTICLE_LIFE {
            now += ms(100);
            assert!(a.frame(now, Some(&mut surface), &style));
        }
        assert!(a.particles().is_empty());
        assert_eq!(a.ticks(), 1 + PARTICLE_LIFE as u64);
    }

    #[test]
    fn gate_limits_ticks_per_interval() {
        let mut a = animation(10);
        a.resize(SurfaceRect::new(0.0, 0.0, 90.0, 90.0));
        let style = Style::default();
        let mut surface = Recorder::new(90.0, 90.0);
        let mut t = 0;
        while t <= 500 {
            a.frame(ms(t), Some(&mut surface), &style);
            t += 16;
        }
        assert!((4..=6).contains(&a.ticks()), "ticks {}", a.ticks());
    }

    #[test]
    fn missing_surface_skips_without_consuming_the_tick() {
        let mut a = animation(10);
        a.resize(SurfaceRect::new(0.0, 0.0, 90.0, 90.0));
        let style = Style::default();
        assert!(!a.frame::<Recorder>(ms(100), None, &style));
        assert_eq!(a.ticks(), 0);

        let mut surface = Recorder::new(90.0, 90.0);
        assert!(a.frame(ms(116), Some(&mut surface), &style));
        assert_eq!(a.ticks(), 1);
    }

    #[test]
    fn paused_animation_does_not_render_but_keeps_clicks() {
        let mut a = animation(100);
        a.resize(SurfaceRect::new(0.0, 0.0, 90.0, 90.0));
        a.set_animating(false);
        a.click(Pointer {
            client_x: 1.0,
            client_y: 1.0,
        });
        let style = Style::default();
        let mut surface = Recorder::new(90.0, 90.0);
        assert!(!a.frame(ms(5000), Some(&mut surface), &style));
        assert!(surface.ops.is_empty());
        assert_eq!(a.particles().len(), BURST_SIZE);

        a.set_animating(true);
        assert!(a.frame(ms(5000), Some(&mut surface), &style));
        assert_eq!(a.particles().len(), BURST_SIZE);
        assert!(a.particles().particles().iter().all(|p| p.life == PARTICLE_LIFE - 1));
    }

    #[test]
    fn click_uses_surface_origin() {
        let mut a = animation(100);
        a.resize(SurfaceRect::new(30.0, 40.0, 90.0, 90.0));
        a.click(Pointer {
            client_x: 130.0,
            client_y: 90.0,
        });
        let p = a.particles().particles()[0];
        assert_eq!((p.x, p.y), (100.0, 50.0));
    }

    #[test]
    fn reset_reseeds_drops_and_clears_particles() {
        let mut a = animation(100);
        a.resize(SurfaceRect::new(0.0, 0.0, 180.0, 90.0));
        a.click(Pointer {
            client_x: 1.0,
            client_y: 1.0,
        });
        a.reset();
        assert_eq!(a.drops().len(), 10);
        assert!(a.particles().is_empty());
    }

    #[test]
    fn canvas_shows_rain_and_burst_glyphs() {
        let mut canvas = Canvas::new(40, 11, 18.0);
        let (w, h) = canvas.size();
        let mut a = animation(100);
        a.resize(SurfaceRect::new(0.0, 0.0, w, h));
        a.click(Pointer {
            client_x: 180.0,
            client_y: 99.0,
        });
        let style = Style::new(10, Rgb::HOT_PINK, "ab");
        assert!(a.frame(ms(100), Some(&mut canvas), &style));
        assert!(!canvas.glow_enabled());

        let mut seen = 0;
        for row in 0..canvas.rows() {
            for col in 0..canvas.cols() {
                if let Some(ch) = canvas.glyph_at(col, row) {
                    assert!(ch == 'a' || ch == 'b');
                    seen += 1;
                }
            }
        }
        // every burst particle starts on the click cell
        assert!(seen >= 1);
        assert!(matches!(canvas.glyph_at(20, 5), Some('a') | Some('b')));
    }
}
