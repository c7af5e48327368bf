//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows return every frame to
//! describe what they want drawn. The engine sorts the returned items into one
//! batch per pipeline and then draws the batches in a fixed order: opaque
//! meshes (baked and pole-light), grass, the portal and finally the additive
//! fireflies, which must come last because they do not write depth.
//!
//! # Key types
//!
//! - [`Render<'a, 'pass>`] is the primary enum describing render operations
//! - [`MeshDraw<'a>`] is a scene mesh with its world-matrix buffer and material
//! - [`Flat<'a>`] is an indexed vertex buffer with its uniforms (grass)
//! - [`Particles<'a>`] is a per-instance buffer drawn as camera-facing quads
//!

use crate::{
    context::Context,
    data_structures::model::{Material, MaterialKind, Mesh},
};

/// A scene mesh: geometry, one-element instance buffer and material.
#[derive(Clone, Copy)]
pub struct MeshDraw<'a> {
    pub mesh: &'a Mesh,
    pub instance: &'a wgpu::Buffer,
    pub material: &'a Material,
}

/// Indexed geometry drawn with a single bind group for its uniforms.
#[derive(Clone, Copy)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: u32,
}

/// Per-instance data expanded into one quad per instance in the vertex shader.
#[derive(Clone, Copy)]
pub struct Particles<'a> {
    pub instance: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: u32,
}

/// Specifies how a flow's objects should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Mesh(MeshDraw)` renders a single scene mesh with its material's pipeline
/// - `Meshes(Vec<MeshDraw>)` renders a batch of scene meshes
/// - `Grass(Flat)` renders the grass field
/// - `Particles(Particles)` renders additive billboards (fireflies)
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
/// - `Custom(...)` invokes a user-defined closure after all batches are drawn
///
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Mesh(MeshDraw<'a>),
    Meshes(Vec<MeshDraw<'a>>),
    Grass(Flat<'a>),
    Particles(Particles<'a>),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>),
}

/// Render items sorted by the pipeline that draws them.
#[derive(Default)]
pub(crate) struct Batches<'a, 'pass> {
    pub(crate) baked: Vec<MeshDraw<'a>>,
    pub(crate) colors: Vec<MeshDraw<'a>>,
    pub(crate) portals: Vec<MeshDraw<'a>>,
    pub(crate) grass: Vec<Flat<'a>>,
    pub(crate) particles: Vec<Particles<'a>>,
    #[allow(clippy::type_complexity)]
    pub(crate) custom: Vec<Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>>,
}

impl<'a, 'pass> Batches<'a, 'pass> {
    fn push_mesh(&mut self, draw: MeshDraw<'a>) {
        match draw.material.kind {
            MaterialKind::Baked => self.baked.push(draw),
            MaterialKind::PoleLight => self.colors.push(draw),
            MaterialKind::Portal => self.portals.push(draw),
        }
    }
}

impl<'a, 'pass> Render<'a, 'pass> {
    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a, 'pass>) {
        match self {
            Render::Mesh(draw) => batches.push_mesh(draw),
            Render::Meshes(draws) => draws.into_iter().for_each(|draw| batches.push_mesh(draw)),
            Render::Grass(flat) => batches.grass.push(flat),
            Render::Particles(particles) => batches.particles.push(particles),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::Custom(f) => batches.custom.push(f),
            Render::None => (),
        }
    }
}

impl<'a, 'pass> From<Vec<MeshDraw<'a>>> for Render<'a, 'pass> {
    fn from(draws: Vec<MeshDraw<'a>>) -> Self {
        Render::Meshes(draws)
    }
}
