//! Fixed-tick driver with an accumulator and world-bounds culling.

use marrow_types::constants::{MAX_SUBSTEPS, WORLD_HALF_HEIGHT, WORLD_HALF_WIDTH};
use marrow_types::{BodyId, Scalar};

use crate::world::World;

/// Rectangular limit box; bodies outside it are culled.
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub half_width: Scalar,
    pub half_height: Scalar,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            half_width: WORLD_HALF_WIDTH,
            half_height: WORLD_HALF_HEIGHT,
        }
    }
}

impl WorldBounds {
    /// True when a position lies inside the box.
    pub fn contains(&self, x: Scalar, y: Scalar) -> bool {
        x.abs() <= self.half_width && y.abs() <= self.half_height
    }
}

/// Drives a world at its fixed tick using the accumulator pattern.
///
/// At most [`MAX_SUBSTEPS`] catch-up steps run per frame; any excess
/// accumulated time is discarded to avoid the spiral of death.
#[derive(Debug, Default)]
pub struct FixedStepper {
    accumulator: Scalar,
    /// Culling bounds for wayward bodies.
    pub bounds: WorldBounds,
}

impl FixedStepper {
    /// Creates a stepper with the reference bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one animation frame's elapsed time; runs zero or more
    /// fixed steps and returns how many ran.
    pub fn advance(&mut self, world: &mut World, frame_dt: Scalar) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let dt = world.params().dt;

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            world.step(dt);
            self.cull(world);
            self.accumulator -= dt;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Removes bodies whose position left the limit box.
    fn cull(&self, world: &mut World) {
        let stray: Vec<BodyId> = world
            .bodies()
            .iter()
            .filter(|(_, b)| !self.bounds.contains(b.pose.x, b.pose.y))
            .map(|(id, _)| id)
            .collect();
        for id in stray {
            world.remove_body(id);
        }
    }
}
