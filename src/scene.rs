//! Scene composition: one live render resource per point cloud.
//!
//! [`SceneComposer`] owns the backend handle for the galaxy and for the
//! star field. Regenerating a field builds the new cloud and its backend
//! resource first, then swaps it in and releases the old one. A failure at
//! any step leaves the previous resource attached.
//!
//! The composer is generic over [`PointCloudBackend`], so the swap logic is
//! the same for the wgpu renderer and for in-memory test backends.

use crate::cloud::PointCloud;
use crate::error::{GenerateError, RenderError, SceneError};
use crate::galaxy::generate_galaxy;
use crate::params::GalaxyParams;
use crate::stars::generate_stars;
use crate::visuals::{ColorSource, PointStyle};
use glam::Mat4;
use rand::Rng;

/// The two point clouds in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Galaxy,
    Stars,
}

impl FieldId {
    /// Draw order.
    pub const ALL: [FieldId; 2] = [FieldId::Galaxy, FieldId::Stars];

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Galaxy => "galaxy",
            FieldId::Stars => "stars",
        }
    }

    /// Build this field's cloud from scratch.
    pub fn generate<R: Rng + ?Sized>(
        self,
        params: &GalaxyParams,
        rng: &mut R,
    ) -> Result<PointCloud, GenerateError> {
        match self {
            FieldId::Galaxy => generate_galaxy(params, rng),
            FieldId::Stars => generate_stars(params, rng),
        }
    }

    pub fn style(self, params: &GalaxyParams) -> PointStyle {
        match self {
            FieldId::Galaxy => PointStyle::galaxy(params),
            FieldId::Stars => PointStyle::stars(params),
        }
    }

    fn slot(self) -> usize {
        match self {
            FieldId::Galaxy => 0,
            FieldId::Stars => 1,
        }
    }
}

/// Creates and releases device resources for point clouds.
pub trait PointCloudBackend {
    type Handle;

    /// Upload `cloud` and prepare whatever `style` needs to draw it.
    fn create(&mut self, cloud: &PointCloud, style: &PointStyle) -> Result<Self::Handle, RenderError>;

    /// Free a handle that is no longer attached.
    fn release(&mut self, handle: Self::Handle);
}

/// A backend handle attached to the scene.
#[derive(Debug)]
pub struct SceneResource<H> {
    handle: H,
    style: PointStyle,
    particles: usize,
    rotation: f32,
}

impl<H> SceneResource<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn style(&self) -> &PointStyle {
        &self.style
    }

    pub fn particles(&self) -> usize {
        self.particles
    }

    /// Rotation about +Y in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }
}

/// Holds at most one live resource per [`FieldId`].
#[derive(Debug)]
pub struct SceneComposer<H> {
    slots: [Option<SceneResource<H>>; 2],
}

impl<H> Default for SceneComposer<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SceneComposer<H> {
    pub fn new() -> Self {
        Self { slots: [None, None] }
    }

    /// Replace `field` with a freshly generated cloud.
    ///
    /// On error nothing changes: the previous resource, if any, stays
    /// attached and the backend holds no extra handle.
    pub fn regenerate<B, R>(
        &mut self,
        backend: &mut B,
        field: FieldId,
        params: &GalaxyParams,
        rng: &mut R,
    ) -> Result<(), SceneError>
    where
        B: PointCloudBackend<Handle = H>,
        R: Rng + ?Sized,
    {
        let cloud = field.generate(params, rng)?;
        let style = field.style(params);
        let handle = backend.create(&cloud, &style)?;

        let slot = &mut self.slots[field.slot()];
        let rotation = slot.as_ref().map_or(0.0, |r| r.rotation);
        let previous = slot.replace(SceneResource {
            handle,
            style,
            particles: cloud.len(),
            rotation,
        });
        if let Some(old) = previous {
            backend.release(old.handle);
        }

        log::debug!("Regenerated {} with {} particles", field.label(), cloud.len());
        Ok(())
    }

    /// Update point size and tint of a live resource without regenerating it.
    ///
    /// Returns `false` if `field` has no resource.
    pub fn restyle(&mut self, field: FieldId, params: &GalaxyParams) -> bool {
        let Some(resource) = self.slots[field.slot()].as_mut() else {
            return false;
        };
        resource.style.size = params.size;
        if let ColorSource::Uniform(_) = resource.style.color {
            resource.style.color = field.style(params).color;
        }
        true
    }

    pub fn get(&self, field: FieldId) -> Option<&SceneResource<H>> {
        self.slots[field.slot()].as_ref()
    }

    pub fn get_mut(&mut self, field: FieldId) -> Option<&mut SceneResource<H>> {
        self.slots[field.slot()].as_mut()
    }

    /// Attached resources in draw order.
    pub fn resources(&self) -> impl Iterator<Item = (FieldId, &SceneResource<H>)> + '_ {
        FieldId::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|r| (field, r)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every attached resource.
    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: PointCloudBackend<Handle = H>,
    {
        for slot in &mut self.slots {
            if let Some(resource) = slot.take() {
                backend.release(resource.handle);
            }
        }
    }
}
