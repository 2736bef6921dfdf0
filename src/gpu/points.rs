//! Point cloud rendering.
//!
//! Each particle is drawn as a camera-facing quad: the vertex buffers are
//! stepped per instance and the six quad corners come from the vertex
//! index. Points blend additively. Pipelines are built lazily, one per
//! color source and depth-write combination.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::cloud::PointCloud;
use crate::error::RenderError;
use crate::scene::SceneResource;
use crate::textures::SpriteTexture;
use crate::visuals::PointStyle;

use super::DEPTH_FORMAT;

pub(crate) const SHADER_SOURCE: &str = include_str!("points.wgsl");

const FLOAT3_STRIDE: wgpu::BufferAddress = 12;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    size: f32,
    attenuation: u32,
    textured: u32,
    _padding: u32,
}

impl MaterialUniform {
    pub(crate) fn new(style: &PointStyle, model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: style.color.uniform_color().extend(1.0).to_array(),
            size: style.size,
            attenuation: style.size_attenuation as u32,
            textured: style.textured as u32,
            _padding: 0,
        }
    }
}

/// Pipeline cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    vertex_color: bool,
    depth_write: bool,
}

impl PipelineKey {
    fn for_style(style: &PointStyle) -> Self {
        Self {
            vertex_color: style.color.is_vertex(),
            depth_write: style.depth_write,
        }
    }
}

/// GPU buffers for one point cloud.
#[derive(Debug)]
pub struct GpuPointCloud {
    positions: wgpu::Buffer,
    colors: Option<wgpu::Buffer>,
    material: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    instances: u32,
    key: PipelineKey,
}

impl GpuPointCloud {
    pub fn instances(&self) -> u32 {
        self.instances
    }

    /// Bytes held on the device, excluding the material uniform.
    pub fn vertex_bytes(&self) -> u64 {
        self.positions.size() + self.colors.as_ref().map_or(0, wgpu::Buffer::size)
    }

    pub(crate) fn destroy(self) {
        self.positions.destroy();
        if let Some(colors) = &self.colors {
            colors.destroy();
        }
        self.material.destroy();
    }
}

/// Overlapping points brighten toward white.
const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Shared shader, layouts, sprite and pipeline cache.
pub(crate) struct PointRenderer {
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    material_layout: wgpu::BindGroupLayout,
    sprite_bind_group: wgpu::BindGroup,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    format: wgpu::TextureFormat,
}

impl PointRenderer {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        sprite: &SpriteTexture,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let sprite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sprite_bind_group = upload_sprite(device, queue, &sprite_layout, sprite);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[camera_layout, &material_layout, &sprite_layout],
            push_constant_ranges: &[],
        });

        Self {
            shader,
            pipeline_layout,
            material_layout,
            sprite_bind_group,
            pipelines: HashMap::new(),
            format,
        }
    }

    /// Upload a cloud and make sure a pipeline exists for its style.
    pub(crate) fn create_cloud(
        &mut self,
        device: &wgpu::Device,
        cloud: &PointCloud,
        style: &PointStyle,
    ) -> Result<GpuPointCloud, RenderError> {
        let max = device.limits().max_buffer_size;
        let bytes = cloud.position_bytes().len() as u64;
        if bytes > max {
            return Err(RenderError::Allocation(format!(
                "{} particles need {} bytes per buffer, device limit is {}",
                cloud.len(),
                bytes,
                max
            )));
        }

        let key = PipelineKey::for_style(style);
        if key.vertex_color && !cloud.has_colors() {
            return Err(RenderError::Gpu(
                "style uses per-vertex colors but the cloud has none".into(),
            ));
        }
        if !self.pipelines.contains_key(&key) {
            let pipeline = self.build_pipeline(device, key);
            self.pipelines.insert(key, pipeline);
        }

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let positions = vertex_buffer(device, "Point Positions", cloud.position_bytes());
        let colors = cloud
            .color_bytes()
            .filter(|_| key.vertex_color)
            .map(|data| vertex_buffer(device, "Point Colors", data));

        let uniform = MaterialUniform::new(style, Mat4::IDENTITY);
        let material = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material.as_entire_binding(),
            }],
        });

        let handle = GpuPointCloud {
            positions,
            colors,
            material,
            material_bind_group,
            instances: cloud.len() as u32,
            key,
        };

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            handle.destroy();
            return Err(RenderError::Allocation(error.to_string()));
        }

        Ok(handle)
    }

    /// Push the style and rotation of a live resource to its uniform.
    pub(crate) fn write_material(&self, queue: &wgpu::Queue, resource: &SceneResource<GpuPointCloud>) {
        let uniform = MaterialUniform::new(resource.style(), resource.model_matrix());
        queue.write_buffer(&resource.handle().material, 0, bytemuck::bytes_of(&uniform));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, cloud: &GpuPointCloud) {
        if cloud.instances == 0 {
            return;
        }
        let Some(pipeline) = self.pipelines.get(&cloud.key) else {
            log::warn!("No pipeline for {:?}, skipping draw", cloud.key);
            return;
        };

        pass.set_pipeline(pipeline);
        pass.set_bind_group(1, &cloud.material_bind_group, &[]);
        pass.set_bind_group(2, &self.sprite_bind_group, &[]);
        pass.set_vertex_buffer(0, cloud.positions.slice(..));
        if let Some(colors) = &cloud.colors {
            pass.set_vertex_buffer(1, colors.slice(..));
        }
        pass.draw(0..6, 0..cloud.instances);
    }

    fn build_pipeline(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let position_attributes = wgpu::vertex_attr_array![0 => Float32x3];
        let color_attributes = wgpu::vertex_attr_array![1 => Float32x3];

        let mut buffers = vec![wgpu::VertexBufferLayout {
            array_stride: FLOAT3_STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &position_attributes,
        }];
        if key.vertex_color {
            buffers.push(wgpu::VertexBufferLayout {
                array_stride: FLOAT3_STRIDE,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &color_attributes,
            });
        }
        let entry_point = if key.vertex_color { "vs_colored" } else { "vs_uniform" };

        log::debug!("Building point pipeline {:?}", key);

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some(entry_point),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(ADDITIVE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: key.depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Vertex buffer holding `data`, or a single zeroed vertex for an empty cloud.
fn vertex_buffer(device: &wgpu::Device, label: &str, data: &[u8]) -> wgpu::Buffer {
    let placeholder = [0u8; FLOAT3_STRIDE as usize];
    let contents = if data.is_empty() { &placeholder[..] } else { data };
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::VERTEX,
    })
}

fn upload_sprite(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sprite: &SpriteTexture,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: sprite.width,
        height: sprite.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Sprite Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &sprite.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * sprite.width),
            rows_per_image: Some(sprite.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Sprite Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Sprite Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GalaxyParams;
    use glam::Vec3;

    fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;
        Ok(module)
    }

    #[test]
    fn test_shader_validates() {
        let module = validate_wgsl(SHADER_SOURCE).unwrap();
        let entries: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entries.contains(&"vs_colored"));
        assert!(entries.contains(&"vs_uniform"));
        assert!(entries.contains(&"fs_main"));
    }

    #[test]
    fn test_material_uniform_layout() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 96);
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
    }

    #[test]
    fn test_material_uniform_from_style() {
        let params = GalaxyParams::default();
        let stars = MaterialUniform::new(&PointStyle::stars(&params), Mat4::IDENTITY);
        assert_eq!(stars.color, params.star_color.extend(1.0).to_array());
        assert_eq!(stars.size, params.size);
        assert_eq!(stars.attenuation, 1);

        let galaxy = MaterialUniform::new(&PointStyle::galaxy(&params), Mat4::IDENTITY);
        assert_eq!(galaxy.color, Vec3::ONE.extend(1.0).to_array());
    }

    #[test]
    fn test_pipeline_key_groups_styles() {
        let params = GalaxyParams::default();
        let galaxy = PipelineKey::for_style(&PointStyle::galaxy(&params));
        let stars = PipelineKey::for_style(&PointStyle::stars(&params));
        let bigger = PipelineKey::for_style(&PointStyle {
            size: 0.1,
            ..PointStyle::galaxy(&params)
        });

        assert_ne!(galaxy, stars);
        assert_eq!(galaxy, bigger);
    }

    #[test]
    fn test_additive_blend_adds_destination() {
        assert_eq!(ADDITIVE_BLEND.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(ADDITIVE_BLEND.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(ADDITIVE_BLEND.alpha.dst_factor, wgpu::BlendFactor::One);
    }
}
