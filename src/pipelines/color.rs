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

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorUniform {
    pub color: [f32; 4],
}

impl From<Color> for ColorUniform {
    fn from(color: Color) -> Self {
        Self {
            color: color.to_vec4(),
        }
    }
}

pub fn color_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(device, wgpu::ShaderStages::FRAGMENT, "color_bind_group_layout")
}

pub fn mk_color_pipeline(
    device: &wgpu::Device,
    target: RenderTarget,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    MaterialPipeline {
        name: "color",
        wgsl: include_str!("color.wgsl"),
        bind_group_layouts: &[camera_layout, &color_layout(device)],
        vertex_layouts: &[ModelVertex::desc(), TransformRaw::desc()],
        options: PipelineOptions::DOUBLE_SIDED,
    }
    .build(device, target)
}

/// An unlit flat-colour material. The colour never changes after creation.
pub fn mk_color_material(device: &wgpu::Device, name: &str, color: Color) -> Material {
    let uniform = UniformResources::new(
        device,
        &color_layout(device),
        ColorUniform::from(color),
        name,
    );
    Material {
        name: name.to_string(),
        kind: MaterialKind::PoleLight,
        bind_group: uniform.bind_group,
    }
}
