use crate::{
    data_structures::{color::Color, grass::GrassVertex, model::Vertex},
    pipelines::{
        basic::{MaterialPipeline, PipelineOptions, RenderTarget, mk_uniform_layout},
        uniform::UniformResources,
    },
};

pub const GRASS_BASE_COLOR: u32 = 0x1f3d12;
pub const GRASS_TIP_COLOR: u32 = 0x7fa83a;
/// Horizontal displacement of a blade tip at full sway.
pub const WIND_STRENGTH: f32 = 0.08;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrassUniform {
    pub base_color: [f32; 4],
    pub tip_color: [f32; 4],
    pub time: f32,
    pub wind_strength: f32,
    pub _padding: [f32; 2],
}

impl Default for GrassUniform {
    fn default() -> Self {
        Self {
            base_color: Color::from_hex(GRASS_BASE_COLOR).to_vec4(),
            tip_color: Color::from_hex(GRASS_TIP_COLOR).to_vec4(),
            time: 0.0,
            wind_strength: WIND_STRENGTH,
            _padding: [0.0; 2],
        }
    }
}

pub fn grass_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(
        device,
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        "grass_bind_group_layout",
    )
}

pub fn mk_grass_uniform(device: &wgpu::Device) -> UniformResources<GrassUniform> {
    UniformResources::new(device, &grass_layout(device), GrassUniform::default(), "grass")
}

pub fn mk_grass_pipeline(
    device: &wgpu::Device,
    target: RenderTarget,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    // Blades are flat strips seen from both sides
    MaterialPipeline {
        name: "grass",
        wgsl: include_str!("grass.wgsl"),
        bind_group_layouts: &[camera_layout, &grass_layout(device)],
        vertex_layouts: &[GrassVertex::desc()],
        options: PipelineOptions::DOUBLE_SIDED,
    }
    .build(device, target)
}
