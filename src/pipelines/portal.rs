use crate::{
    data_structures::{
        color::Color,
        model::{Material, MaterialKind, ModelVertex, Vertex},
        transform::TransformRaw,
    },
    pipelines::{
        basic::{MaterialPipeline, PipelineOptions, RenderTarget, mk_uniform_layout},
        uniform::UniformResources,
    },
};

/// Uniforms of the portal swirl. Colours are linear RGB, alpha unused.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PortalUniform {
    pub inside_color: [f32; 4],
    pub outside_color: [f32; 4],
    pub time: f32,
    pub _padding: [f32; 3],
}

impl PortalUniform {
    pub fn new(inside: Color, outside: Color) -> Self {
        Self {
            inside_color: inside.to_vec4(),
            outside_color: outside.to_vec4(),
            time: 0.0,
            _padding: [0.0; 3],
        }
    }
}

pub fn portal_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(device, wgpu::ShaderStages::FRAGMENT, "portal_bind_group_layout")
}

pub fn mk_portal_pipeline(
    device: &wgpu::Device,
    target: RenderTarget,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    MaterialPipeline {
        name: "portal",
        wgsl: include_str!("portal.wgsl"),
        bind_group_layouts: &[camera_layout, &portal_layout(device)],
        vertex_layouts: &[ModelVertex::desc(), TransformRaw::desc()],
        options: PipelineOptions::DOUBLE_SIDED,
    }
    .build(device, target)
}

/// The animated portal material and the uniform that drives it.
pub fn mk_portal_material(
    device: &wgpu::Device,
    uniform: PortalUniform,
) -> (Material, UniformResources<PortalUniform>) {
    let uniform = UniformResources::new(device, &portal_layout(device), uniform, "portal");
    let material = Material {
        name: "portal".to_string(),
        kind: MaterialKind::Portal,
        bind_group: uniform.bind_group.clone(),
    };
    (material, uniform)
}
