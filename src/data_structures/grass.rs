//! Procedural grass field.
//!
//! Blades are scattered over an annulus around the portal and each blade is a
//! tapered strip that bends forward quadratically. The construction is closed
//! form: for a blade with `S` segments, level `j` sits at `t = j / S` of the
//! blade height, levels below the tip carry a left and a right vertex and the
//! tip carries a single vertex. That gives `2S + 1` vertices and
//! `6(S - 1) + 3` indices per blade. All blades end up in one vertex buffer and
//! one `u32` index buffer, so the whole field is a single draw call.

use anyhow::ensure;
use cgmath::{InnerSpace, Vector2, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::data_structures::model::Vertex;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    /// Blade root on the ground plane, used as the wind phase.
    pub root: [f32; 2],
    /// How much the wind displaces this vertex: `0` at the root, `1` at the tip.
    pub sway: f32,
}

impl Vertex for GrassVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GrassVertex>() as wgpu::BufferAddress,
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Shape and distribution of the grass field.
#[derive(Debug, Clone, PartialEq)]
pub struct GrassConfig {
    pub blade_count: u32,
    /// Outer radius of the field around the origin.
    pub radius: f32,
    /// Radius of the clearing in the middle that stays free of grass.
    pub inner_radius: f32,
    pub blade_width: f32,
    pub blade_height: f32,
    /// Relative height jitter, `0.4` means heights in `[0.6h, 1.4h]`.
    pub height_variation: f32,
    pub segments: u32,
    /// Forward bend of the tip relative to the blade height.
    pub lean: f32,
    pub seed: Option<u64>,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            blade_count: 6000,
            radius: 2.4,
            inner_radius: 0.45,
            blade_width: 0.025,
            blade_height: 0.14,
            height_variation: 0.4,
            segments: 4,
            lean: 0.35,
            seed: None,
        }
    }
}

impl GrassConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.segments >= 1, "a grass blade needs at least one segment");
        ensure!(self.radius > 0.0, "grass radius must be positive, got {}", self.radius);
        ensure!(
            self.inner_radius >= 0.0 && self.inner_radius <= self.radius,
            "grass inner radius {} must lie in [0, {}]",
            self.inner_radius,
            self.radius
        );
        ensure!(self.blade_width > 0.0, "blade width must be positive");
        ensure!(self.blade_height > 0.0, "blade height must be positive");
        ensure!(
            (0.0..1.0).contains(&self.height_variation),
            "height variation must lie in [0, 1), got {}",
            self.height_variation
        );
        ensure!(self.lean >= 0.0, "blade lean must not be negative");
        Ok(())
    }

    pub fn vertices_per_blade(&self) -> usize {
        vertices_per_blade(self.segments)
    }

    pub fn indices_per_blade(&self) -> usize {
        indices_per_blade(self.segments)
    }
}

pub fn vertices_per_blade(segments: u32) -> usize {
    2 * segments as usize + 1
}

/// Two triangles per segment below the tip and one for the tip. A blade
/// without segments has no triangles.
pub fn indices_per_blade(segments: u32) -> usize {
    match segments {
        0 => 0,
        segments => 6 * (segments as usize - 1) + 3,
    }
}

/// Placement of a single blade before it is turned into vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blade {
    /// Root position on the ground plane as (x, z).
    pub root: Vector2<f32>,
    /// Rotation around the up axis in radians.
    pub yaw: f32,
    pub height: f32,
    /// Forward bend of the tip in world units.
    pub bend: f32,
}

impl Blade {
    /// Direction the blade leans towards.
    pub fn facing(&self) -> Vector3<f32> {
        Vector3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Direction across the blade.
    pub fn side(&self) -> Vector3<f32> {
        Vector3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GrassMesh {
    pub vertices: Vec<GrassVertex>,
    pub indices: Vec<u32>,
}

impl GrassMesh {
    pub fn blade_count(&self, config: &GrassConfig) -> usize {
        self.vertices.len() / config.vertices_per_blade()
    }
}

/// Scatter `config.blade_count` blades uniformly (by area) over the annulus.
pub fn scatter_blades<R: Rng>(config: &GrassConfig, rng: &mut R) -> Vec<Blade> {
    let inner_sq = config.inner_radius * config.inner_radius;
    let outer_sq = config.radius * config.radius;
    (0..config.blade_count)
        .map(|_| {
            let r = (inner_sq + (outer_sq - inner_sq) * rng.r#gen::<f32>()).sqrt();
            let theta = rng.r#gen::<f32>() * std::f32::consts::TAU;
            let jitter = (rng.r#gen::<f32>() * 2.0 - 1.0) * config.height_variation;
            let height = config.blade_height * (1.0 + jitter);
            Blade {
                root: Vector2::new(r * theta.cos(), r * theta.sin()),
                yaw: rng.r#gen::<f32>() * std::f32::consts::TAU,
                height,
                bend: config.lean * height * (0.5 + rng.r#gen::<f32>()),
            }
        })
        .collect()
}

/// Append the vertices and indices of one blade. `config.segments` is at least 1.
fn build_blade(
    blade: &Blade,
    config: &GrassConfig,
    vertices: &mut Vec<GrassVertex>,
    indices: &mut Vec<u32>,
) {
    let segments = config.segments;
    let base = vertices.len() as u32;
    let root = Vector3::new(blade.root.x, 0.0, blade.root.y);
    let up = Vector3::unit_y();
    let facing = blade.facing();
    let side = blade.side().normalize();

    for j in 0..=segments {
        let t = j as f32 / segments as f32;
        let center = root + facing * (blade.bend * t * t) + up * (t * blade.height);
        let sway = t * t;
        if j == segments {
            vertices.push(GrassVertex {
                position: center.into(),
                tex_coords: [0.5, t],
                root: blade.root.into(),
                sway,
            });
        } else {
            let half_width = config.blade_width * 0.5 * (1.0 - t);
            vertices.push(GrassVertex {
                position: (center - side * half_width).into(),
                tex_coords: [0.0, t],
                root: blade.root.into(),
                sway,
            });
            vertices.push(GrassVertex {
                position: (center + side * half_width).into(),
                tex_coords: [1.0, t],
                root: blade.root.into(),
                sway,
            });
        }
    }

    for j in 0..segments - 1 {
        let l0 = base + 2 * j;
        let r0 = l0 + 1;
        let l1 = l0 + 2;
        let r1 = l0 + 3;
        indices.extend_from_slice(&[l0, r0, l1, r0, r1, l1]);
    }
    let last = segments - 1;
    let tip = base + 2 * segments;
    indices.extend_from_slice(&[base + 2 * last, base + 2 * last + 1, tip]);
}

/// Build the whole field from already placed blades.
pub fn build_field(blades: &[Blade], config: &GrassConfig) -> anyhow::Result<GrassMesh> {
    config.validate()?;
    let mut mesh = GrassMesh {
        vertices: Vec::with_capacity(blades.len() * config.vertices_per_blade()),
        indices: Vec::with_capacity(blades.len() * config.indices_per_blade()),
    };
    for blade in blades {
        build_blade(blade, config, &mut mesh.vertices, &mut mesh.indices);
    }
    Ok(mesh)
}

/// Validate `config`, scatter the blades and build the merged mesh.
pub fn generate(config: &GrassConfig) -> anyhow::Result<GrassMesh> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let blades = scatter_blades(config, &mut rng);
    let mesh = build_field(&blades, config)?;
    log::info!(
        "generated {} grass blades ({} vertices, {} indices)",
        blades.len(),
        mesh.vertices.len(),
        mesh.indices.len()
    );
    Ok(mesh)
}
