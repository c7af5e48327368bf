use crate::{
    data_structures::{
        model::{Material, MaterialKind, ModelVertex, Vertex},
        texture::Texture,
        transform::TransformRaw,
    },
    pipelines::basic::{
        MaterialPipeline, PipelineOptions, RenderTarget, mk_texture_bind_group, mk_texture_layout,
    },
};

pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_texture_layout(device, "baked_texture_bind_group_layout")
}

pub fn mk_baked_pipeline(
    device: &wgpu::Device,
    target: RenderTarget,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    MaterialPipeline {
        name: "baked",
        wgsl: include_str!("baked.wgsl"),
        bind_group_layouts: &[camera_layout, &texture_layout(device)],
        vertex_layouts: &[ModelVertex::desc(), TransformRaw::desc()],
        options: PipelineOptions::OPAQUE,
    }
    .build(device, target)
}

/// The material drawn with the baked lighting texture.
pub fn mk_baked_material(device: &wgpu::Device, baked: &Texture) -> Material {
    let bind_group = mk_texture_bind_group(device, &texture_layout(device), baked, "baked_bind_group");
    Material {
        name: "baked".to_string(),
        kind: MaterialKind::Baked,
        bind_group,
    }
}
