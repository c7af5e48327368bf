//! glTF scene loading.
//!
//! Reads a `.glb`/`.gltf` file into a [`SceneNode`] tree. Every node keeps its
//! name and local transform; nodes with a mesh get one GPU [`Mesh`] per
//! triangle primitive. Materials stored in the file are ignored, the scene
//! assigns its own by node name.

use std::io::{BufReader, Cursor};

use anyhow::{Context as _, bail};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{MaterialKind, Mesh, ModelVertex},
        scene_graph::{MeshNode, SceneNode},
    },
    resources::texture::load_binary,
};

/// Mesh compression that would need a decoder to read the vertex data.
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Fail for extensions whose data cannot be read without a decoder.
pub fn check_extensions<'a>(extensions: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
    for extension in extensions {
        if extension == DRACO_EXTENSION {
            bail!(
                "the scene uses {DRACO_EXTENSION}, which is not supported; \
                 export it again without Draco compression"
            );
        }
    }
    Ok(())
}

pub async fn load_scene_gltf(file_name: &str, device: &wgpu::Device) -> anyhow::Result<SceneNode> {
    let gltf_bytes = load_binary(file_name).await?;
    let gltf_reader = BufReader::new(Cursor::new(gltf_bytes));
    let gltf = gltf::Gltf::from_reader(gltf_reader).with_context(|| {
        format!("could not parse {file_name} (Draco-compressed scenes are not supported)")
    })?;
    check_extensions(gltf.extensions_used())?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .with_context(|| format!("{file_name} references a missing binary chunk"))?;
                buffer_data.push(blob.into());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .with_context(|| format!("{file_name} contains no scene"))?;

    let mut root = SceneNode::new(file_name);
    for node in scene.nodes() {
        root.add_child(to_scene_node(node, &buffer_data, device)?);
    }
    root.update_world_transform_all();
    log::info!("Loaded {file_name} with {} nodes", root.node_count() - 1);
    Ok(root)
}

fn to_scene_node(
    node: gltf::Node,
    buffers: &[Vec<u8>],
    device: &wgpu::Device,
) -> anyhow::Result<SceneNode> {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));

    let mut scene_node = match node.mesh() {
        Some(mesh) => {
            let meshes = load_meshes(&mesh, &name, buffers, device)?;
            let material = MaterialKind::for_node(&name).unwrap_or(MaterialKind::Baked);
            SceneNode::with_mesh(name, MeshNode::new(device, meshes, material))
        }
        None => SceneNode::new(name),
    };
    scene_node.local = node.transform().into();

    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buffers, device)?);
    }
    Ok(scene_node)
}

fn load_meshes(
    mesh: &gltf::Mesh,
    node_name: &str,
    buffers: &[Vec<u8>],
    device: &wgpu::Device,
) -> anyhow::Result<Vec<Mesh>> {
    let mut meshes = Vec::new();
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping primitive {} of {node_name}: only triangle lists are supported",
                primitive.index()
            );
            continue;
        }
        let (vertices, indices) = read_primitive(&primitive, buffers)
            .with_context(|| format!("invalid primitive {} of {node_name}", primitive.index()))?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{node_name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{node_name} Index Buffer")),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        meshes.push(Mesh {
            name: node_name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
        });
    }
    Ok(meshes)
}

fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[Vec<u8>],
) -> anyhow::Result<(Vec<ModelVertex>, Vec<u32>)> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .context("primitive has no positions")?
        .collect();
    let mut vertices: Vec<ModelVertex> = positions
        .into_iter()
        .map(|position| ModelVertex {
            position,
            ..Default::default()
        })
        .collect();

    if let Some(normals) = reader.read_normals() {
        vertices
            .iter_mut()
            .zip(normals)
            .for_each(|(vertex, normal)| vertex.normal = normal);
    }
    if let Some(tex_coords) = reader.read_tex_coords(0) {
        vertices
            .iter_mut()
            .zip(tex_coords.into_f32())
            .for_each(|(vertex, uv)| vertex.tex_coords = uv);
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };
    if let Some(out_of_range) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        bail!(
            "index {out_of_range} exceeds the vertex count {}",
            vertices.len()
        );
    }
    Ok((vertices, indices))
}
