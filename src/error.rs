//! Error types for galaxy generation and rendering.
//!
//! Parameter validation, buffer construction, GPU setup, texture loading and
//! scene regeneration each have their own error type. [`SceneError`] and
//! [`AppError`] wrap the lower level errors so `?` works across layers.

use std::fmt;

/// A parameter value that the generators cannot accept.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// The galaxy needs at least one branch.
    ZeroBranches,
    /// Value must be strictly greater than zero.
    NonPositive { name: &'static str, value: f32 },
    /// Value must not be negative.
    Negative { name: &'static str, value: f32 },
    /// The jitter exponent must be at least 1.
    PowerBelowOne(f32),
    /// Value is NaN or infinite.
    NotFinite { name: &'static str },
    /// A color channel is outside `[0, 1]`.
    ColorOutOfRange { name: &'static str },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::ZeroBranches => write!(f, "Galaxy must have at least one branch"),
            ParamError::NonPositive { name, value } => {
                write!(f, "Parameter '{}' must be positive, got {}", name, value)
            }
            ParamError::Negative { name, value } => {
                write!(f, "Parameter '{}' must not be negative, got {}", name, value)
            }
            ParamError::PowerBelowOne(value) => {
                write!(f, "Randomness power must be at least 1.0, got {}", value)
            }
            ParamError::NotFinite { name } => write!(f, "Parameter '{}' is not a finite number", name),
            ParamError::ColorOutOfRange { name } => {
                write!(f, "Color '{}' has a channel outside 0.0-1.0", name)
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// Flat buffers that do not describe whole particles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    /// Positions length is not a multiple of 3.
    NotTriples(usize),
    /// Colors length differs from positions length.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudError::NotTriples(len) => {
                write!(f, "Position buffer length {} is not a multiple of 3", len)
            }
            CloudError::LengthMismatch { expected, actual } => write!(
                f,
                "Color buffer has {} values but positions have {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for CloudError {}

/// Errors that can occur while generating a point cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Host memory for the buffers could not be reserved.
    Allocation { particles: usize },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Allocation { particles } => write!(
                f,
                "Failed to allocate point buffers for {} particles",
                particles
            ),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Errors raised by a render backend while creating point cloud resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The device could not hold the requested buffers.
    Allocation(String),
    /// Any other device-side failure.
    Gpu(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Allocation(msg) => write!(f, "GPU allocation failed: {}", msg),
            RenderError::Gpu(msg) => write!(f, "GPU error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// A failed regeneration. The previous resource is still attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    Generate(GenerateError),
    Render(RenderError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Generate(e) => write!(f, "Generation failed: {}", e),
            SceneError::Render(e) => write!(f, "Resource creation failed: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Generate(e) => Some(e),
            SceneError::Render(e) => Some(e),
        }
    }
}

impl From<GenerateError> for SceneError {
    fn from(e: GenerateError) -> Self {
        SceneError::Generate(e)
    }
}

impl From<RenderError> for SceneError {
    fn from(e: RenderError) -> Self {
        SceneError::Render(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// The surface reports no usable texture format.
    UnsupportedSurface,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::UnsupportedSurface => write!(f, "The window surface has no supported texture format"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur during texture loading.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode the image file.
    ImageLoad(image::ImageError),
    /// Image has a zero dimension.
    Empty,
    /// Pixel data length does not match `width * height * 4`.
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "Failed to load image: {}", e),
            TextureError::Empty => write!(f, "Image has zero width or height"),
            TextureError::SizeMismatch {
                width,
                height,
                actual,
            } => write!(
                f,
                "RGBA data for {}x{} image has {} bytes",
                width, height, actual
            ),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Empty | TextureError::SizeMismatch { .. } => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

/// Errors that stop the viewer.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}
