//! Background star field generator.
//!
//! Stars fill an axis-aligned cube centered on the origin. They carry no
//! per-particle color; the renderer tints them with `star_color`.

use crate::cloud::{CloudBuilder, PointCloud};
use crate::error::GenerateError;
use crate::params::GalaxyParams;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Edge length of the star cube.
pub const STAR_FIELD_EXTENT: f32 = 20.0;

/// One uniformly distributed star position in `[-EXTENT/2, EXTENT/2)` per axis.
pub fn star_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let x = (rng.gen::<f32>() - 0.5) * STAR_FIELD_EXTENT;
    let y = (rng.gen::<f32>() - 0.5) * STAR_FIELD_EXTENT;
    let z = (rng.gen::<f32>() - 0.5) * STAR_FIELD_EXTENT;
    Vec3::new(x, y, z)
}

/// Generate `params.stars` positions.
pub fn generate_stars<R: Rng + ?Sized>(
    params: &GalaxyParams,
    rng: &mut R,
) -> Result<PointCloud, GenerateError> {
    let mut cloud = CloudBuilder::with_capacity(params.stars as usize, false)?;
    for _ in 0..params.stars {
        cloud.push(star_position(rng));
    }
    Ok(cloud.finish())
}

/// Star field generation with a fresh entropy-seeded RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct StarFieldGenerator;

impl StarFieldGenerator {
    pub fn generate(&self, params: &GalaxyParams) -> Result<PointCloud, GenerateError> {
        generate_stars(params, &mut SmallRng::from_entropy())
    }
}
