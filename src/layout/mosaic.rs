//! Randomly scattered, slightly rotated squares.
//!
//! Each photo gets a random square. A candidate whose bounding box overlaps
//! an already placed square is resampled, up to [`MAX_PLACEMENT_ATTEMPTS`]
//! times in total; after that the last candidate is kept even if it
//! overlaps. Rotation is ignored by the overlap test.

use log::debug;
use rand::Rng;

use super::{Arrangement, LayoutContext, PanelStyle, Rect, Shadow, Slot};

/// Candidates tried per photo before an overlapping one is accepted.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 50;

const STYLE: PanelStyle = PanelStyle {
    corner_radius: 16.0,
    inset: 10.0,
    inner_radius: 12.0,
    shadow: Shadow::new(0.2, 20.0, 5.0, 5.0),
};

/// Parameters of the scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mosaic {
    /// Smallest square side (inclusive).
    pub min_size: f32,
    /// Largest square side (exclusive).
    pub max_size: f32,
    /// Distance every square keeps from the canvas edge.
    pub margin: f32,
    /// Rotations are drawn from `[-max_rotation, max_rotation)` radians.
    pub max_rotation: f32,
    pub max_attempts: usize,
}

impl Default for Mosaic {
    fn default() -> Self {
        Self {
            min_size: 150.0,
            max_size: 250.0,
            margin: 15.0,
            max_rotation: 0.15,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Mosaic {
    /// Samples a square and its rotation.
    fn candidate(&self, ctx: &mut LayoutContext<'_>) -> (Rect, f32) {
        let size = self.min_size + ctx.rng.random::<f32>() * (self.max_size - self.min_size);
        let x = self.margin + ctx.rng.random::<f32>() * (ctx.width() - size - self.margin * 2.0);
        let y = self.margin + ctx.rng.random::<f32>() * (ctx.height() - size - self.margin * 2.0);
        let rotation = (ctx.rng.random::<f32>() - 0.5) * self.max_rotation * 2.0;
        (Rect::new(x, y, size, size), rotation)
    }
}

impl Arrangement for Mosaic {
    fn arrange(&self, ctx: &mut LayoutContext<'_>) -> Vec<Slot> {
        let mut slots: Vec<Slot> = Vec::with_capacity(ctx.count);

        for index in 0..ctx.count {
            let mut attempts = 0;
            let (rect, rotation) = loop {
                let (rect, rotation) = self.candidate(ctx);
                attempts += 1;
                let clear = slots.iter().all(|slot| !slot.panel.rect().intersects(&rect));
                if clear {
                    break (rect, rotation);
                }
                if attempts >= self.max_attempts {
                    debug!("mosaic photo {index}: accepting overlap after {attempts} attempts");
                    break (rect, rotation);
                }
            };
            slots.push(STYLE.slot(index, rect, rotation));
        }

        slots
    }
}
