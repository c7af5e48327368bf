//! Mesh and material GPU resources.

use std::ops::Range;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// One glTF primitive uploaded to the GPU.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

/// The three ways a scene mesh can be shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit, sampled from the baked lighting texture.
    Baked,
    /// Unlit flat colour of the pole lamps.
    PoleLight,
    /// Animated portal shader.
    Portal,
}

impl MaterialKind {
    /// Which material the node with this name should be drawn with.
    pub fn for_node(name: &str) -> Option<Self> {
        match name {
            "PoleLightA" | "PoleLightB" => Some(MaterialKind::PoleLight),
            "PortalLight" => Some(MaterialKind::Portal),
            "baked" | "AxeHandle" | "AxeHead" | "Plane" => Some(MaterialKind::Baked),
            _ => None,
        }
    }
}

/// A material: which pipeline to use and the bind group (group 1) it needs.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub bind_group: wgpu::BindGroup,
}

pub trait DrawMesh<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        material: &'a Material,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        material: &'b Material,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, camera_bind_group, &[]);
        self.set_bind_group(1, &material.bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}

/// One material per [`MaterialKind`], shared by every mesh of the scene.
#[derive(Debug)]
pub struct MaterialSet {
    pub baked: Material,
    pub pole_light: Material,
    pub portal: Material,
}

impl MaterialSet {
    pub fn get(&self, kind: MaterialKind) -> &Material {
        match kind {
            MaterialKind::Baked => &self.baked,
            MaterialKind::PoleLight => &self.pole_light,
            MaterialKind::Portal => &self.portal,
        }
    }
}
