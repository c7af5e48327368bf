use crate::{
    data_structures::{fireflies::FireflyRaw, model::Vertex},
    pipelines::{
        basic::{MaterialPipeline, PipelineOptions, RenderTarget, mk_uniform_layout},
        uniform::UniformResources,
    },
};

/// Vertices of the two triangles making up one firefly quad.
pub const VERTICES_PER_FIREFLY: u32 = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FirefliesUniform {
    pub time: f32,
    pub pixel_ratio: f32,
    /// Base point size in pixels.
    pub size: f32,
    pub _padding: f32,
    /// Render target size in physical pixels.
    pub resolution: [f32; 2],
    pub _padding2: [f32; 2],
}

impl FirefliesUniform {
    pub fn new(size: f32, pixel_ratio: f32, resolution: [f32; 2]) -> Self {
        Self {
            time: 0.0,
            pixel_ratio,
            size,
            _padding: 0.0,
            resolution,
            _padding2: [0.0; 2],
        }
    }
}

pub fn fireflies_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(device, wgpu::ShaderStages::VERTEX, "fireflies_bind_group_layout")
}

pub fn mk_fireflies_uniform(
    device: &wgpu::Device,
    uniform: FirefliesUniform,
) -> UniformResources<FirefliesUniform> {
    UniformResources::new(device, &fireflies_layout(device), uniform, "fireflies")
}

pub fn mk_fireflies_pipeline(
    device: &wgpu::Device,
    target: RenderTarget,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    MaterialPipeline {
        name: "fireflies",
        wgsl: include_str!("fireflies.wgsl"),
        bind_group_layouts: &[camera_layout, &fireflies_layout(device)],
        vertex_layouts: &[FireflyRaw::desc()],
        options: PipelineOptions::ADDITIVE,
    }
    .build(device, target)
}
