//! Shared pipeline construction.
//!
//! Every pipeline reads `vs_main`/`fs_main` from one WGSL file, draws
//! triangle lists into a [`RenderTarget`] and tests against [`DepthTexture`].
//! What differs is captured by [`MaterialPipeline`] and [`PipelineOptions`].

use crate::data_structures::texture::{DepthTexture, Texture};

/// Colour format and sample count shared by the scene pass and every pipeline drawn in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
}

impl RenderTarget {
    pub fn multisample(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}

/// Blending, depth testing and culling of one pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub blend: Option<wgpu::BlendState>,
    pub depth_write: bool,
    pub depth_compare: wgpu::CompareFunction,
    pub cull_mode: Option<wgpu::Face>,
}

impl PipelineOptions {
    pub const OPAQUE: Self = Self {
        blend: Some(wgpu::BlendState::REPLACE),
        depth_write: true,
        depth_compare: wgpu::CompareFunction::Less,
        cull_mode: Some(wgpu::Face::Back),
    };

    /// Opaque geometry seen from both sides: the portal plane, pole lights, grass blades.
    pub const DOUBLE_SIDED: Self = Self {
        cull_mode: None,
        ..Self::OPAQUE
    };

    /// `src * src_alpha + dst`, like `THREE.AdditiveBlending`. Writes no depth,
    /// so it has to be drawn after everything opaque.
    pub const ADDITIVE: Self = Self {
        blend: Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Zero,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
        depth_write: false,
        depth_compare: wgpu::CompareFunction::Less,
        cull_mode: None,
    };

    /// Premultiplied alpha on top of the finished scene, ignoring depth.
    pub const OVERLAY: Self = Self {
        blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        depth_write: false,
        depth_compare: wgpu::CompareFunction::Always,
        cull_mode: None,
    };
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// Everything a material pipeline is made of besides the device and format.
pub struct MaterialPipeline<'a> {
    pub name: &'a str,
    pub wgsl: &'a str,
    /// Group 0 is the camera for everything drawn in world space.
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    pub options: PipelineOptions,
}

impl MaterialPipeline<'_> {
    pub fn build(&self, device: &wgpu::Device, target: RenderTarget) -> wgpu::RenderPipeline {
        let label = |part: &str| format!("{}_{part}", self.name);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label("shader")),
            source: wgpu::ShaderSource::Wgsl(self.wgsl.into()),
        });
        let bind_group_layouts: Vec<Option<&wgpu::BindGroupLayout>> =
            self.bind_group_layouts.iter().copied().map(Some).collect();
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&label("pipeline_layout")),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label("pipeline")),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: self.vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target.format,
                    blend: self.options.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: self.options.cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::FORMAT,
                depth_write_enabled: Some(self.options.depth_write),
                depth_compare: Some(self.options.depth_compare),
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: target.multisample(),
            multiview_mask: None,
            cache: None,
        })
    }
}

/// Layout of a single uniform buffer at binding 0.
pub fn mk_uniform_layout(
    device: &wgpu::Device,
    visibility: wgpu::ShaderStages,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Layout of a filterable 2D texture at binding 0 and its sampler at binding 1.
pub fn mk_texture_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        label: Some(label),
    })
}

pub fn mk_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some(label),
    })
}
