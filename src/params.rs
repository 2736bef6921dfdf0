//! Generation parameters for the galaxy and the background star field.
//!
//! [`GalaxyParams`] is the single configuration shared by both generators,
//! the animation driver and the parameter panel. Colors are stored in
//! linear RGB; use [`srgb_hex`] to author them the way designers pick them.

use crate::error::ParamError;
use glam::Vec3;

/// Inclusive bounds and step for a numeric control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp a value into the range. NaN maps to `min`.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn clamp_u32(&self, value: u32) -> u32 {
        (value as f32).clamp(self.min, self.max) as u32
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Panel ranges for every numeric parameter.
pub mod ranges {
    use super::ParamRange;

    pub const COUNT: ParamRange = ParamRange::new(100.0, 1_000_000.0, 100.0);
    pub const SIZE: ParamRange = ParamRange::new(0.001, 0.1, 0.001);
    pub const RADIUS: ParamRange = ParamRange::new(0.01, 20.0, 0.01);
    pub const BRANCHES: ParamRange = ParamRange::new(2.0, 20.0, 1.0);
    pub const SPIN: ParamRange = ParamRange::new(-5.0, 5.0, 0.001);
    pub const RANDOMNESS: ParamRange = ParamRange::new(0.0, 2.0, 0.001);
    pub const RANDOMNESS_POWER: ParamRange = ParamRange::new(1.0, 10.0, 0.001);
    pub const GALAXY_ROTATION: ParamRange = ParamRange::new(0.01, 1.0, 0.01);
    pub const STARS_ROTATION: ParamRange = ParamRange::new(0.01, 2.0, 0.01);
    pub const STARS: ParamRange = ParamRange::new(0.0, 1_000_000.0, 100.0);
}

/// Convert a `0xRRGGBB` sRGB color to linear RGB.
///
/// ```
/// use galaxy_gen::srgb_hex;
/// use glam::Vec3;
///
/// assert!(srgb_hex(0xffffff).abs_diff_eq(Vec3::ONE, 1e-6));
/// assert_eq!(srgb_hex(0x000000), Vec3::ZERO);
/// ```
pub fn srgb_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Parameters for both point clouds.
///
/// # Example
///
/// ```
/// use galaxy_gen::GalaxyParams;
///
/// let params = GalaxyParams {
///     count: 10_000,
///     branches: 5,
///     ..Default::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyParams {
    /// Number of galaxy particles.
    pub count: u32,
    /// Point size in world units.
    pub size: f32,
    /// Maximum distance of a particle from the galaxy center.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Radians of twist per unit of radius.
    pub spin: f32,
    /// Jitter scale relative to the particle's radius.
    pub randomness: f32,
    /// Exponent shaping the jitter toward zero.
    pub randomness_power: f32,
    /// Color at the center.
    pub inside_color: Vec3,
    /// Color at `radius`.
    pub outside_color: Vec3,
    /// Galaxy rotation rate in radians per second.
    pub galaxy_rotation: f32,
    /// Star field rotation rate in radians per second, applied reversed.
    pub stars_rotation: f32,
    /// Number of background stars.
    pub stars: u32,
    /// Uniform color of every background star.
    pub star_color: Vec3,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 500_000,
            size: 0.07,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.4,
            randomness_power: 3.0,
            inside_color: srgb_hex(0xff6030),
            outside_color: srgb_hex(0x1b3984),
            galaxy_rotation: 0.05,
            stars_rotation: 0.02,
            stars: 25_000,
            star_color: srgb_hex(0xf4f4d4),
        }
    }
}

impl GalaxyParams {
    /// Check that the generators and renderer can use these values.
    ///
    /// Panel ranges are not enforced here; see [`clamped`](Self::clamped).
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.branches == 0 {
            return Err(ParamError::ZeroBranches);
        }
        positive("radius", self.radius)?;
        positive("size", self.size)?;
        non_negative("randomness", self.randomness)?;
        finite("randomness_power", self.randomness_power)?;
        if self.randomness_power < 1.0 {
            return Err(ParamError::PowerBelowOne(self.randomness_power));
        }
        finite("spin", self.spin)?;
        finite("galaxy_rotation", self.galaxy_rotation)?;
        finite("stars_rotation", self.stars_rotation)?;
        unit_color("inside_color", self.inside_color)?;
        unit_color("outside_color", self.outside_color)?;
        unit_color("star_color", self.star_color)?;
        Ok(())
    }

    /// Copy with every ranged field clamped into its panel range.
    pub fn clamped(&self) -> Self {
        Self {
            count: ranges::COUNT.clamp_u32(self.count),
            size: ranges::SIZE.clamp(self.size),
            radius: ranges::RADIUS.clamp(self.radius),
            branches: ranges::BRANCHES.clamp_u32(self.branches),
            spin: ranges::SPIN.clamp(self.spin),
            randomness: ranges::RANDOMNESS.clamp(self.randomness),
            randomness_power: ranges::RANDOMNESS_POWER.clamp(self.randomness_power),
            inside_color: clamp_color(self.inside_color),
            outside_color: clamp_color(self.outside_color),
            galaxy_rotation: ranges::GALAXY_ROTATION.clamp(self.galaxy_rotation),
            stars_rotation: ranges::STARS_ROTATION.clamp(self.stars_rotation),
            stars: ranges::STARS.clamp_u32(self.stars),
            star_color: clamp_color(self.star_color),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_stars(mut self, stars: u32) -> Self {
        self.stars = stars;
        self
    }

    pub fn with_branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_randomness(mut self, randomness: f32, power: f32) -> Self {
        self.randomness = randomness;
        self.randomness_power = power;
        self
    }

    pub fn with_colors(mut self, inside: Vec3, outside: Vec3) -> Self {
        self.inside_color = inside;
        self.outside_color = outside;
        self
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NotFinite { name })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ParamError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ParamError::NonPositive { name, value });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ParamError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ParamError::Negative { name, value });
    }
    Ok(())
}

fn unit_color(name: &'static str, color: Vec3) -> Result<(), ParamError> {
    let in_range = |c: f32| c.is_finite() && (0.0..=1.0).contains(&c);
    if color.to_array().into_iter().all(in_range) {
        Ok(())
    } else {
        Err(ParamError::ColorOutOfRange { name })
    }
}

fn clamp_color(color: Vec3) -> Vec3 {
    let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    Vec3::new(c(color.x), c(color.y), c(color.z))
}
