//! # galaxy-gen
//!
//! Procedural spiral galaxy and background star field point clouds, with a
//! wgpu viewer for tuning them live.
//!
//! The generators are plain functions from [`GalaxyParams`] and an RNG to a
//! [`PointCloud`] of flat `f32` buffers. They have no GPU dependency and can
//! be used on their own:
//!
//! ```
//! use galaxy_gen::prelude::*;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let params = GalaxyParams::default().with_count(10_000).with_branches(4);
//! let mut rng = SmallRng::seed_from_u64(1);
//!
//! let galaxy = generate_galaxy(&params, &mut rng).unwrap();
//! let stars = generate_stars(&params, &mut rng).unwrap();
//!
//! assert_eq!(galaxy.positions().len(), 3 * 10_000);
//! assert!(stars.colors().is_none());
//! ```
//!
//! ## Viewer
//!
//! [`run`] opens a window with both clouds, an orbit camera (drag to
//! rotate, scroll to zoom) and a "Galaxy" panel. Most panel controls
//! regenerate their cloud when the edit is finished; the star color
//! regenerates on every change.
//!
//! ## Scene
//!
//! [`SceneComposer`] keeps one render resource per cloud and swaps it safely
//! on regeneration. It is generic over [`PointCloudBackend`], which the
//! wgpu renderer implements and tests can implement in memory.
//!
//! Set `RUST_LOG=debug` to see regeneration and pipeline logs.

pub mod animation;
pub mod app;
pub mod cloud;
pub mod error;
pub mod galaxy;
pub mod gpu;
pub mod panel;
pub mod params;
pub mod scene;
pub mod stars;
pub mod textures;
pub mod time;
pub mod visuals;

pub use animation::{galaxy_angle, stars_angle, AnimationDriver};
pub use app::run;
pub use cloud::PointCloud;
pub use error::{
    AppError, CloudError, GenerateError, GpuError, ParamError, RenderError, SceneError,
    TextureError,
};
pub use galaxy::{generate_galaxy, sample_particle, GalaxyGenerator, GalaxySample};
pub use params::{srgb_hex, GalaxyParams, ParamRange};
pub use scene::{FieldId, PointCloudBackend, SceneComposer, SceneResource};
pub use stars::{generate_stars, StarFieldGenerator, STAR_FIELD_EXTENT};
pub use time::Clock;
pub use visuals::{ColorSource, PointStyle};

/// Common imports.
pub mod prelude {
    pub use crate::animation::AnimationDriver;
    pub use crate::cloud::PointCloud;
    pub use crate::galaxy::{generate_galaxy, GalaxyGenerator};
    pub use crate::params::{srgb_hex, GalaxyParams};
    pub use crate::scene::{FieldId, PointCloudBackend, SceneComposer};
    pub use crate::stars::{generate_stars, StarFieldGenerator};
    pub use crate::visuals::{ColorSource, PointStyle};
    pub use glam::Vec3;
}
