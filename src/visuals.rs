//! Material settings for point clouds.
//!
//! A [`PointStyle`] describes how one cloud is drawn: its point size,
//! whether that size shrinks with distance and where its color comes from.
//! The renderer turns a style into a pipeline and a material uniform.
//! Points always blend additively.

use crate::params::GalaxyParams;
use glam::Vec3;

/// Where a cloud's color comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSource {
    /// Per-particle colors from the cloud's color buffer.
    Vertex,
    /// One color for every particle.
    Uniform(Vec3),
}

impl ColorSource {
    pub fn is_vertex(&self) -> bool {
        matches!(self, ColorSource::Vertex)
    }

    /// The uniform color, or white for per-vertex colors.
    pub fn uniform_color(&self) -> Vec3 {
        match self {
            ColorSource::Vertex => Vec3::ONE,
            ColorSource::Uniform(c) => *c,
        }
    }
}

/// How a point cloud is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    /// Point size. World units when attenuated, pixels otherwise.
    pub size: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub color: ColorSource,
    /// Modulate by the shared sprite texture instead of a plain soft disc.
    pub textured: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 0.07,
            size_attenuation: true,
            depth_write: false,
            color: ColorSource::Vertex,
            textured: true,
        }
    }
}

impl PointStyle {
    /// Style for the galaxy: per-vertex colored, textured.
    pub fn galaxy(params: &GalaxyParams) -> Self {
        Self {
            size: params.size,
            ..Default::default()
        }
    }

    /// Style for the star field: same material as the galaxy with a uniform tint.
    pub fn stars(params: &GalaxyParams) -> Self {
        Self {
            size: params.size,
            color: ColorSource::Uniform(params.star_color),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_galaxy_style_matches_params() {
        let params = GalaxyParams::default();
        let style = PointStyle::galaxy(&params);
        assert_eq!(style.size, params.size);
        assert!(style.color.is_vertex());
        assert!(style.size_attenuation);
        assert!(!style.depth_write);
    }

    #[test]
    fn test_star_style_uses_uniform_color() {
        let params = GalaxyParams::default();
        let style = PointStyle::stars(&params);
        assert_eq!(style.color, ColorSource::Uniform(params.star_color));
        assert_eq!(style.color.uniform_color(), params.star_color);
    }

    #[test]
    fn test_fields_share_material_except_color() {
        let params = GalaxyParams::default();
        let galaxy = PointStyle::galaxy(&params);
        let stars = PointStyle::stars(&params);
        assert_eq!(
            PointStyle {
                color: ColorSource::Vertex,
                ..stars
            },
            galaxy
        );
    }
}
