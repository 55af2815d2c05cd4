// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

pub const BURST_SIZE: usize = 25;
pub const PARTICLE_LIFE: i32 = 80;
pub const DEFAULT_MAX_PARTICLES: usize = 2000;

const MIN_MAGNITUDE: f32 = 2.0;
const MAGNITUDE_SPREAD: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub life: i32,
    pub max_life: i32,
}

impl Particle {
    /// Opacity proportional to the remaining life: 255 at spawn, 0 at death.
    pub fn alpha(&self) -> u8 {
        if self.max_life <= 0 || self.life <= 0 {
            return 0;
        }
        let ratio = self.life.min(self.max_life) as f32 / self.max_life as f32;
        (ratio * 255.0).round() as u8
    }
}

/// Click-burst particles in insertion order, capped at `max_particles`.
pub struct ParticleField {
    particles: Vec<Particle>,
    max_particles: usize,
    rng: StdRng,
    rand_unit: Uniform<f32>,
}

impl ParticleField {
    pub fn new(max_particles: usize) -> Self {
        Self::with_rng(max_particles, StdRng::from_os_rng())
    }

    pub fn with_rng(max_particles: usize, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            max_particles,
            rng,
            rand_unit: Uniform::new(0.0, 1.0).expect("valid range"),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Appends [`BURST_SIZE`] particles fanned out evenly around `(x, y)`.
    /// Returns how many of the oldest particles were evicted to stay under
    /// the cap.
    pub fn spawn_burst(&mut self, x: f32, y: f32) -> usize {
        self.particles.reserve(BURST_SIZE);
        for k in 0..BURST_SIZE {
            let angle = TAU * k as f32 / BURST_SIZE as f32;
            let magnitude = MIN_MAGNITUDE + self.rand_unit.sample(&mut self.rng) * MAGNITUDE_SPREAD;
            self.particles.push(Particle {
                x,
                y,
                dx: angle.cos() * magnitude,
                dy: angle.sin() * magnitude,
                life: PARTICLE_LIFE,
                max_life: PARTICLE_LIFE,
            });
        }

        let excess = self.particles.len().saturating_sub(self.max_particles);
        if excess > 0 {
            self.particles.drain(..excess);
            log::debug!(
                "particle cap {} reached, evicted {} oldest",
                self.max_particles,
                excess
            );
        }
        excess
    }

    /// Moves every particle one step and ages it; particles whose life ran
    /// out are removed in the same call.
    pub fn advance_and_prune(&mut self) {
        for p in &mut self.particles {
            p.x += p.dx;
            p.y += p.dy;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ParticleField {
        ParticleField::with_rng(DEFAULT_MAX_PARTICLES, StdRng::seed_from_u64(11))
    }

    #[test]
    fn burst_is_evenly_fanned() {
        let mut f = field();
        f.spawn_burst(100.0, 50.0);
        assert_eq!(f.len(), BURST_SIZE);

        for (k, p) in f.particles().iter().enumerate() {
            assert_eq!((p.x, p.y), (100.0, 50.0));
            assert_eq!(p.life, PARTICLE_LIFE);
            assert_eq!(p.max_life, PARTICLE_LIFE);

            let magnitude = p.dx.hypot(p.dy);
            assert!((MIN_MAGNITUDE - 1e-4..MIN_MAGNITUDE + MAGNITUDE_SPREAD + 1e-4)
                .contains(&magnitude));

            let expected = TAU * k as f32 / BURST_SIZE as f32;
            let angle = p.dy.atan2(p.dx).rem_euclid(TAU);
            let diff = (angle - expected).abs();
            assert!(diff < 1e-4 || (TAU - diff) < 1e-4, "k={} angle={}", k, angle);
        }
    }

    #[test]
    fn bursts_are_additive() {
        let mut f = field();
        f.spawn_burst(0.0, 0.0);
        f.spawn_burst(10.0, 10.0);
        f.spawn_burst(10.0, 10.0);
        assert_eq!(f.len(), 3 * BURST_SIZE);
    }

    #[test]
    fn advance_moves_and_ages() {
        let mut f = field();
        f.spawn_burst(0.0, 0.0);
        let first = f.particles()[0];
        f.advance_and_prune();
        let p = f.particles()[0];
        assert_eq!(p.x, first.dx);
        assert_eq!(p.y, first.dy);
        assert_eq!(p.life, PARTICLE_LIFE - 1);
    }

    #[test]
    fn last_life_is_pruned_in_the_same_tick() {
        let mut f = field();
        f.spawn_burst(0.0, 0.0);
        for _ in 0..PARTICLE_LIFE - 1 {
            f.advance_and_prune();
            assert!(f.particles().iter().all(|p| p.life > 0));
        }
        assert_eq!(f.len(), BURST_SIZE);
        assert!(f.particles().iter().all(|p| p.life == 1));
        f.advance_and_prune();
        assert!(f.is_empty());
    }

    #[test]
    fn staggered_bursts_expire_independently() {
        let mut f = field();
        f.spawn_burst(0.0, 0.0);
        for _ in 0..40 {
            f.advance_and_prune();
        }
        f.spawn_burst(5.0, 5.0);
        for _ in 0..40 {
            f.advance_and_prune();
        }
        assert_eq!(f.len(), BURST_SIZE);
        assert!(f.particles().iter().all(|p| p.life == 40));
    }

    #[test]
    fn alpha_fades_with_life() {
        let mut p = Particle {
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        };
        assert_eq!(p.alpha(), 255);
        let mut last = p.alpha();
        while p.life > 0 {
            p.life -= 1;
            assert!(p.alpha() <= last);
            last = p.alpha();
        }
        assert_eq!(p.alpha(), 0);
        p.life = 1;
        assert_eq!(p.alpha(), 3);
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let mut f = ParticleField::with_rng(60, StdRng::seed_from_u64(3));
        assert_eq!(f.spawn_burst(1.0, 1.0), 0);
        assert_eq!(f.spawn_burst(2.0, 2.0), 0);
        assert_eq!(f.spawn_burst(3.0, 3.0), 15);
        assert_eq!(f.len(), 60);
        assert_eq!(f.particles()[0].x, 1.0);
        assert_eq!(f.particles()[10].x, 2.0);
        assert_eq!(f.particles()[59].x, 3.0);
    }

    #[test]
    fn zero_cap_disables_bursts() {
        let mut f = ParticleField::with_rng(0, StdRng::seed_from_u64(3));
        assert_eq!(f.spawn_burst(1.0, 1.0), BURST_SIZE);
        assert!(f.is_empty());
    }
}
