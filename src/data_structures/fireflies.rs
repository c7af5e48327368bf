//! Firefly particle layout.
//!
//! Each firefly is one GPU instance carrying its resting position and a size
//! factor. The bobbing motion and the screen-space size are computed in the
//! vertex shader from the shared uniforms, so the instance buffer is written
//! once and never touched again.

use rand::Rng;

use crate::data_structures::model::Vertex;

/// Fireflies spread over a 4 x 4 square centred on the origin.
pub const FIREFLY_SPREAD: f32 = 4.0;
/// Fireflies float between the ground and this height.
pub const FIREFLY_CEILING: f32 = 1.7;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FireflyRaw {
    pub position: [f32; 3],
    pub scale: f32,
}

impl Vertex for FireflyRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<FireflyRaw>() as wgpu::BufferAddress,
            // One quad per firefly, the corners come from the vertex index
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Random resting positions and sizes for `count` fireflies.
pub fn scatter_fireflies<R: Rng>(count: usize, rng: &mut R) -> Vec<FireflyRaw> {
    (0..count)
        .map(|_| {
            let x = (rng.r#gen::<f32>() - 0.5) * FIREFLY_SPREAD;
            let y = rng.r#gen::<f32>() * FIREFLY_CEILING;
            let z = (rng.r#gen::<f32>() - 0.5) * FIREFLY_SPREAD;
            FireflyRaw {
                position: [x, y, z],
                scale: rng.r#gen::<f32>(),
            }
        })
        .collect()
}

/// Vertical offset applied by the vertex shader, mirrored here for the CPU side.
pub fn bob_offset(time: f32, firefly: &FireflyRaw) -> f32 {
    (time + firefly.position[0] * 100.0).sin() * firefly.scale * 0.2
}

/// Point size in physical pixels, as the vertex shader computes it.
///
/// `view_depth` is the distance along the camera's forward axis (positive in
/// front of the camera).
pub fn point_size(size: f32, scale: f32, pixel_ratio: f32, view_depth: f32) -> f32 {
    size * scale * pixel_ratio / view_depth
}
