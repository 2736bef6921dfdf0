//! Constant-rate rotation of the scene.
//!
//! The galaxy turns about +Y at `galaxy_rotation` rad/s and the star field
//! turns the other way at `stars_rotation` rad/s. Angles are derived from
//! total elapsed time rather than accumulated, so changing a rate takes
//! effect on the next frame from the same time base.

use crate::params::GalaxyParams;
use crate::scene::{FieldId, SceneComposer};
use crate::time::Clock;

/// Galaxy angle after `elapsed` seconds.
pub fn galaxy_angle(elapsed: f32, params: &GalaxyParams) -> f32 {
    elapsed * params.galaxy_rotation
}

/// Star field angle after `elapsed` seconds. Opposite sense to the galaxy.
pub fn stars_angle(elapsed: f32, params: &GalaxyParams) -> f32 {
    -(elapsed * params.stars_rotation)
}

/// Drives per-frame rotation from a [`Clock`].
#[derive(Debug, Default)]
pub struct AnimationDriver {
    clock: Clock,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rotations for `elapsed` seconds since start.
    pub fn tick<H>(&self, elapsed: f32, params: &GalaxyParams, scene: &mut SceneComposer<H>) {
        if let Some(galaxy) = scene.get_mut(FieldId::Galaxy) {
            galaxy.set_rotation(galaxy_angle(elapsed, params));
        }
        if let Some(stars) = scene.get_mut(FieldId::Stars) {
            stars.set_rotation(stars_angle(elapsed, params));
        }
    }

    /// Advance the clock and rotate the scene. Returns elapsed seconds.
    pub fn frame<H>(&mut self, params: &GalaxyParams, scene: &mut SceneComposer<H>) -> f32 {
        let elapsed = self.clock.tick();
        self.tick(elapsed, params, scene);
        elapsed
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}
