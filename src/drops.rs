// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

/// Drops wrap once they fall this far below the surface.
pub const OFFSCREEN_MARGIN: f32 = 50.0;
/// Where a wrapped drop restarts.
pub const RESPAWN_Y: f32 = -50.0;
/// A uniform draw above this re-seeds a drop early (about 0.5% per tick).
pub const RESEED_THRESHOLD: f32 = 0.995;

pub const MIN_DROP_SPEED: f32 = 0.5;
pub const MAX_DROP_SPEED: f32 = 2.0;

/// One falling-text column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drop {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

pub struct DropField {
    drops: Vec<Drop>,
    height: f32,
    cell_size: f32,
    rng: StdRng,
    rand_unit: Uniform<f32>,
    rand_speed: Uniform<f32>,
}

impl DropField {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            drops: Vec::new(),
            height: 0.0,
            cell_size: 0.0,
            rng,
            rand_unit: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_speed: Uniform::new(MIN_DROP_SPEED, MAX_DROP_SPEED).expect("valid range"),
        }
    }

    /// Rebuilds the whole field: one drop per `cell_size`-wide column.
    pub fn initialize(&mut self, width: f32, height: f32, cell_size: f32) {
        self.height = height.max(0.0);
        self.cell_size = cell_size;

        let columns = if cell_size > 0.0 && width > 0.0 {
            (width / cell_size).floor() as usize
        } else {
            0
        };

        self.drops.clear();
        self.drops.reserve(columns);
        for i in 0..columns {
            let y = self.rand_unit.sample(&mut self.rng) * self.height;
            let speed = self.rand_speed.sample(&mut self.rng);
            self.drops.push(Drop {
                x: i as f32 * cell_size,
                y,
                speed,
            });
        }
    }

    pub fn drops(&self) -> &[Drop] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Moves drop `index` down by `speed * speed_factor`, wrapping it to
    /// [`RESPAWN_Y`] with a fresh speed once it is past the bottom margin or
    /// when the random re-seed fires.
    pub fn advance(&mut self, index: usize, speed_factor: f32) {
        let Some(drop) = self.drops.get_mut(index) else {
            return;
        };
        drop.y += drop.speed * speed_factor;

        let past_bottom = drop.y > self.height + OFFSCREEN_MARGIN;
        if past_bottom || self.rand_unit.sample(&mut self.rng) > RESEED_THRESHOLD {
            drop.y = RESPAWN_Y;
            drop.speed = self.rand_speed.sample(&mut self.rng);
        }
    }

    #[allow(dead_code)]
    pub fn advance_all(&mut self, speed_factor: f32) {
        for i in 0..self.drops.len() {
            self.advance(i, speed_factor);
        }
    }
}

impl Default for DropField {
    fn default() -> Self {
        Self::new()
    }
}
