//! Flat point cloud buffers.
//!
//! A [`PointCloud`] stores `N` particles as tightly packed `f32` triples,
//! ready to upload as vertex data. Positions are always present; colors are
//! optional and, when present, match the positions one to one.

use crate::error::{CloudError, GenerateError};
use glam::Vec3;

/// Immutable positions and optional per-particle colors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Option<Vec<f32>>,
}

impl PointCloud {
    /// A cloud with no particles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a cloud from existing buffers.
    ///
    /// `positions` must hold whole `xyz` triples and `colors`, when given,
    /// must be the same length.
    pub fn from_parts(positions: Vec<f32>, colors: Option<Vec<f32>>) -> Result<Self, CloudError> {
        if positions.len() % 3 != 0 {
            return Err(CloudError::NotTriples(positions.len()));
        }
        if let Some(colors) = &colors {
            if colors.len() != positions.len() {
                return Err(CloudError::LengthMismatch {
                    expected: positions.len(),
                    actual: colors.len(),
                });
            }
        }
        Ok(Self { positions, colors })
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Position of particle `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Color of particle `i`, if the cloud carries colors.
    pub fn color(&self, i: usize) -> Option<Vec3> {
        self.colors
            .as_ref()
            .map(|c| Vec3::from_slice(&c[i * 3..i * 3 + 3]))
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Positions as raw bytes for a vertex buffer.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as raw bytes for a vertex buffer.
    pub fn color_bytes(&self) -> Option<&[u8]> {
        self.colors.as_deref().map(bytemuck::cast_slice)
    }
}

/// Appends particles into buffers reserved up front.
pub(crate) struct CloudBuilder {
    positions: Vec<f32>,
    colors: Option<Vec<f32>>,
}

impl CloudBuilder {
    /// Reserve room for `particles` particles. Fails instead of aborting
    /// when the allocator cannot provide the memory.
    pub(crate) fn with_capacity(particles: usize, with_colors: bool) -> Result<Self, GenerateError> {
        let floats = particles
            .checked_mul(3)
            .ok_or(GenerateError::Allocation { particles })?;
        let positions = reserve(floats, particles)?;
        let colors = if with_colors {
            Some(reserve(floats, particles)?)
        } else {
            None
        };
        Ok(Self { positions, colors })
    }

    pub(crate) fn push(&mut self, position: Vec3) {
        self.positions.extend_from_slice(&position.to_array());
    }

    pub(crate) fn push_colored(&mut self, position: Vec3, color: Vec3) {
        self.push(position);
        if let Some(colors) = &mut self.colors {
            colors.extend_from_slice(&color.to_array());
        }
    }

    pub(crate) fn finish(self) -> PointCloud {
        debug_assert!(self
            .colors
            .as_ref()
            .map_or(true, |c| c.len() == self.positions.len()));
        PointCloud {
            positions: self.positions,
            colors: self.colors,
        }
    }
}

fn reserve(floats: usize, particles: usize) -> Result<Vec<f32>, GenerateError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(floats)
        .map_err(|_| GenerateError::Allocation { particles })?;
    Ok(buf)
}
