// Copyright (c) 2026 rezky_nightky

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::particles::ParticleField;
use crate::surface::SurfaceRect;

/// Pointer position in host coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub client_x: f32,
    pub client_y: f32,
}

/// Turns clicks over the surface into particle bursts.
#[derive(Clone, Copy, Debug)]
pub struct InteractionHandler {
    bounds: SurfaceRect,
}

impl InteractionHandler {
    pub fn new(bounds: SurfaceRect) -> Self {
        Self { bounds }
    }

    pub fn set_bounds(&mut self, bounds: SurfaceRect) {
        self.bounds = bounds;
    }

    /// Spawns a burst at the surface-local position of `pointer` and returns
    /// that position.
    pub fn click(&self, pointer: Pointer, particles: &mut ParticleField) -> (f32, f32) {
        let (x, y) = self.bounds.to_local(pointer.client_x, pointer.client_y);
        let evicted = particles.spawn_burst(x, y);
        log::debug!(
            "burst at ({:.1}, {:.1}), {} live, {} evicted",
            x,
            y,
            particles.len(),
            evicted
        );
        (x, y)
    }
}

/// Host pixel under a terminal mouse press; other mouse activity is ignored.
///
/// `cell_px` is the canvas cell height; terminal columns are half as wide.
pub fn pointer_from_mouse(ev: &MouseEvent, cell_px: f32) -> Option<Pointer> {
    if !matches!(ev.kind, MouseEventKind::Down(MouseButton::Left)) {
        return None;
    }
    let col_px = cell_px / 2.0;
    Some(Pointer {
        client_x: (ev.column as f32 + 0.5) * col_px,
        client_y: (ev.row as f32 + 0.5) * cell_px,
    })
}
