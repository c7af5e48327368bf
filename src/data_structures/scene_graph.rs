//! Scene graph and hierarchical scene organization.
//!
//! The glTF node tree is kept as a tree of [`SceneNode`]s. Every node has a
//! local transform relative to its parent and a cached world transform.
//! Nodes that carry geometry own a [`MeshNode`] with a one-element instance
//! buffer that receives the world matrix on [`SceneNode::write_to_buffers`].

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        transform::Transform,
        model::{MaterialKind, MaterialSet, Mesh},
    },
    render::MeshDraw,
};

/// Geometry attached to a scene node.
#[derive(Debug)]
pub struct MeshNode {
    pub meshes: Vec<Mesh>,
    pub material: MaterialKind,
    instance_buffer: wgpu::Buffer,
}

impl MeshNode {
    pub fn new(device: &wgpu::Device, meshes: Vec<Mesh>, material: MaterialKind) -> Self {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&[Transform::identity().to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            meshes,
            material,
            instance_buffer,
        }
    }
}

#[derive(Debug)]
pub struct SceneNode {
    pub name: String,
    pub local: Transform,
    world: Transform,
    pub mesh: Option<MeshNode>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// A node without geometry, used for the scene root and for groups.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform::identity(),
            world: Transform::identity(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: MeshNode) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::new(name)
        }
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn world_transform(&self) -> &Transform {
        &self.world
    }

    /// Find a node by name. Direct children are checked before descending so
    /// that top-level objects win over equally named nested ones.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if let Some(child) = self.children.iter().find(|child| child.name == name) {
            return Some(child);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if let Some(idx) = self.children.iter().position(|child| child.name == name) {
            return self.children.get_mut(idx);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }

    /// Detach the node called `name` from wherever it sits below `self`.
    pub fn take_child(&mut self, name: &str) -> Option<SceneNode> {
        if let Some(idx) = self.children.iter().position(|child| child.name == name) {
            return Some(self.children.remove(idx));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.take_child(name))
    }

    /// Set the material of the named node. Returns `false` if there is no such
    /// node or it carries no geometry.
    pub fn assign_material(&mut self, name: &str, material: MaterialKind) -> bool {
        match self.find_mut(name).and_then(|node| node.mesh.as_mut()) {
            Some(mesh) => {
                mesh.material = material;
                true
            }
            None => false,
        }
    }

    /// Recompute world transforms below `parent`.
    pub fn update_world_transforms(&mut self, parent: &Transform) {
        self.world = parent * &self.local;
        let world = self.world.clone();
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world);
        }
    }

    pub fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Transform::identity());
    }

    /// Upload the cached world transforms into the instance buffers.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue) {
        if let Some(mesh) = &self.mesh {
            queue.write_buffer(
                &mesh.instance_buffer,
                0,
                bytemuck::cast_slice(&[self.world.to_raw()]),
            );
        }
        self.children
            .iter()
            .for_each(|child| child.write_to_buffers(queue));
    }

    /// Number of nodes in this subtree including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Names of every node in this subtree, depth first.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        for child in &self.children {
            names.extend(child.names());
        }
        names
    }

    pub fn get_render<'a>(&'a self, materials: &'a MaterialSet) -> Vec<MeshDraw<'a>> {
        let mut draws = Vec::new();
        self.collect_draws(materials, &mut draws);
        draws
    }

    fn collect_draws<'a>(&'a self, materials: &'a MaterialSet, draws: &mut Vec<MeshDraw<'a>>) {
        if let Some(mesh_node) = &self.mesh {
            draws.extend(mesh_node.meshes.iter().map(|mesh| MeshDraw {
                mesh,
                instance: &mesh_node.instance_buffer,
                material: materials.get(mesh_node.material),
            }));
        }
        for child in &self.children {
            child.collect_draws(materials, draws);
        }
    }
}
