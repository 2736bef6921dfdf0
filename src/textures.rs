//! Particle sprite texture.
//!
//! Both point clouds share one RGBA sprite. Its RGB tints the particle
//! color and its green channel is the alpha mask, so a grayscale image
//! works as both. When no image is available a procedural soft disc is
//! used instead.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use crate::error::TextureError;
use std::path::Path;

/// Where the viewer looks for the sprite at startup.
pub const DEFAULT_SPRITE_PATH: &str = "assets/particle.png";

/// RGBA8 sprite image, sampled with linear filtering.
#[derive(Debug, Clone)]
pub struct SpriteTexture {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SpriteTexture {
    /// Wrap raw RGBA data.
    ///
    /// Fails with [`TextureError::Empty`] for a zero-sized image and
    /// [`TextureError::SizeMismatch`] unless `data` is `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Decode an image file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// Load `path`, or fall back to [`soft_disc`](Self::soft_disc) with a warning.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(sprite) => {
                log::info!(
                    "Loaded sprite {} ({}x{})",
                    path.as_ref().display(),
                    sprite.width,
                    sprite.height
                );
                sprite
            }
            Err(e) => {
                log::warn!(
                    "Sprite {} unavailable ({}), using procedural disc",
                    path.as_ref().display(),
                    e
                );
                Self::soft_disc(64)
            }
        }
    }

    /// White disc with a smooth falloff to transparent at the edge.
    pub fn soft_disc(size: u32) -> Self {
        let size = size.max(2);
        let mut data = Vec::with_capacity(size as usize * size as usize * 4);
        let center = (size as f32 - 1.0) / 2.0;

        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 - center) / center;
                let dy = (y as f32 - center) / center;
                let d = (dx * dx + dy * dy).sqrt();
                let falloff = (1.0 - d).clamp(0.0, 1.0);
                let v = (falloff * falloff * 255.0) as u8;
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }

        Self {
            data,
            width: size,
            height: size,
        }
    }
}
