//! Spiral galaxy generator.
//!
//! Every particle is placed on one of `branches` evenly spaced arms at a
//! uniformly random distance from the center. The arm is twisted by
//! `spin * radius` radians and each axis receives a signed, power-shaped
//! jitter that grows with the radius, so the core stays tight while the
//! outer arms fray. Colors blend from `inside_color` at the center to
//! `outside_color` at the rim.
//!
//! ```
//! use galaxy_gen::{generate_galaxy, GalaxyParams};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let params = GalaxyParams::default().with_count(1_000);
//! let mut rng = SmallRng::seed_from_u64(7);
//! let cloud = generate_galaxy(&params, &mut rng).unwrap();
//! assert_eq!(cloud.len(), 1_000);
//! assert!(cloud.has_colors());
//! ```

use crate::cloud::{CloudBuilder, PointCloud};
use crate::error::GenerateError;
use crate::params::GalaxyParams;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Intermediate values drawn for one galaxy particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxySample {
    /// Distance from the center before jitter.
    pub radius: f32,
    /// Base angle of the particle's arm.
    pub branch_angle: f32,
    /// Extra twist, `radius * spin`.
    pub spin_angle: f32,
    /// Per-axis offset added to the arm position.
    pub jitter: Vec3,
}

impl GalaxySample {
    /// Point on the arm curve, without jitter.
    pub fn arm_position(&self) -> Vec3 {
        let angle = self.branch_angle + self.spin_angle;
        Vec3::new(angle.cos() * self.radius, 0.0, angle.sin() * self.radius)
    }

    pub fn position(&self) -> Vec3 {
        self.arm_position() + self.jitter
    }

    pub fn color(&self, params: &GalaxyParams) -> Vec3 {
        radial_color(self.radius, params)
    }
}

/// Angle of the arm that particle `index` belongs to.
///
/// Zero branches is treated as one.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    let branches = branches.max(1);
    (index % branches) as f32 / branches as f32 * TAU
}

/// Gradient color at `radius`. A non-positive galaxy radius yields the inside color.
pub fn radial_color(radius: f32, params: &GalaxyParams) -> Vec3 {
    if params.radius <= 0.0 || params.radius.is_nan() {
        return params.inside_color;
    }
    let t = (radius / params.radius).clamp(0.0, 1.0);
    params.inside_color.lerp(params.outside_color, t)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, power: f32, scale: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powf(power);
    let sign = if rng.gen::<f32>() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign * scale
}

/// Draw the values for particle `index`.
///
/// Consumes seven uniform draws: the radius, then a magnitude and sign for
/// each of x, y and z.
pub fn sample_particle<R: Rng + ?Sized>(index: u32, params: &GalaxyParams, rng: &mut R) -> GalaxySample {
    let radius = rng.gen::<f32>() * params.radius.max(0.0);
    let scale = params.randomness * radius;
    let power = params.randomness_power;

    let jx = jitter(rng, power, scale);
    let jy = jitter(rng, power, scale);
    let jz = jitter(rng, power, scale);

    GalaxySample {
        radius,
        branch_angle: branch_angle(index, params.branches),
        spin_angle: radius * params.spin,
        jitter: Vec3::new(jx, jy, jz),
    }
}

/// Generate the galaxy point cloud with positions and per-particle colors.
pub fn generate_galaxy<R: Rng + ?Sized>(
    params: &GalaxyParams,
    rng: &mut R,
) -> Result<PointCloud, GenerateError> {
    let mut cloud = CloudBuilder::with_capacity(params.count as usize, true)?;
    for i in 0..params.count {
        let sample = sample_particle(i, params, rng);
        cloud.push_colored(sample.position(), sample.color(params));
    }
    Ok(cloud.finish())
}

/// Galaxy generation with a fresh entropy-seeded RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct GalaxyGenerator;

impl GalaxyGenerator {
    pub fn generate(&self, params: &GalaxyParams) -> Result<PointCloud, GenerateError> {
        generate_galaxy(params, &mut SmallRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_buffer_lengths() {
        let params = GalaxyParams::default().with_count(1234);
        let cloud = generate_galaxy(&params, &mut rng()).unwrap();
        assert_eq!(cloud.positions().len(), 3 * 1234);
        assert_eq!(cloud.colors().unwrap().len(), 3 * 1234);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let params = GalaxyParams::default().with_count(0);
        let cloud = generate_galaxy(&params, &mut rng()).unwrap();
        assert!(cloud.is_empty());
        assert_eq!(cloud.colors().map(<[f32]>::len), Some(0));
    }

    #[test]
    fn test_branch_angle_cycles() {
        assert_eq!(branch_angle(0, 4), 0.0);
        assert!((branch_angle(1, 4) - TAU / 4.0).abs() < 1e-6);
        assert_eq!(branch_angle(4, 4), 0.0);
        assert_eq!(branch_angle(7, 0), 0.0);
    }

    #[test]
    fn test_sample_radius_bounded() {
        let params = GalaxyParams::default();
        let mut rng = rng();
        for i in 0..1000 {
            let s = sample_particle(i, &params, &mut rng);
            assert!(s.radius >= 0.0 && s.radius <= params.radius);
            assert!((s.spin_angle - s.radius * params.spin).abs() < 1e-6);
        }
    }

    #[test]
    fn test_jitter_bounded_by_randomness() {
        let params = GalaxyParams::default().with_randomness(0.5, 2.0);
        let mut rng = rng();
        for i in 0..1000 {
            let s = sample_particle(i, &params, &mut rng);
            let limit = params.randomness * s.radius + 1e-6;
            assert!(s.jitter.abs().max_element() <= limit);
        }
    }

    #[test]
    fn test_radial_color_endpoints() {
        let params = GalaxyParams::default();
        assert_eq!(radial_color(0.0, &params), params.inside_color);
        assert!(radial_color(params.radius, &params).abs_diff_eq(params.outside_color, 1e-6));

        let mid = radial_color(params.radius * 0.5, &params);
        let expected = (params.inside_color + params.outside_color) * 0.5;
        assert!(mid.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_collapsed_radius_uses_inside_color() {
        let params = GalaxyParams::default().with_radius(0.0).with_count(50);
        let cloud = generate_galaxy(&params, &mut rng()).unwrap();
        for i in 0..cloud.len() {
            assert_eq!(cloud.position(i), Vec3::ZERO);
            assert_eq!(cloud.color(i), Some(params.inside_color));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let params = GalaxyParams::default().with_count(500);
        let a = generate_galaxy(&params, &mut SmallRng::seed_from_u64(9)).unwrap();
        let b = generate_galaxy(&params, &mut SmallRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_uses_fresh_randomness() {
        let params = GalaxyParams::default().with_count(500);
        let a = GalaxyGenerator.generate(&params).unwrap();
        let b = GalaxyGenerator.generate(&params).unwrap();
        assert_eq!(a.len(), b.len());
        assert_ne!(a.positions(), b.positions());
    }
}
