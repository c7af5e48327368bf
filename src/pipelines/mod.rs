//! Render pipelines of the scene.
//!
//! Every pipeline uses the camera uniform at group 0. Group 1 holds what the
//! material needs:
//!
//! - `baked`: the baked lighting texture and its sampler
//! - `color`: a flat colour (pole lights)
//! - `portal`: time and the inside/outside colours of the portal swirl
//! - `grass`: time and the base/tip colours of the grass field
//! - `fireflies`: time, pixel ratio, size and resolution of the fireflies
//!
//! [`Pipelines`] creates all of them once per [`basic::RenderTarget`]. The
//! `gui` pipeline draws the debug panel in screen space and has no camera.

pub mod baked;
pub mod basic;
pub mod color;
pub mod fireflies;
pub mod grass;
pub mod gui;
pub mod portal;
pub mod uniform;

#[derive(Debug)]
pub struct Pipelines {
    pub baked: wgpu::RenderPipeline,
    pub color: wgpu::RenderPipeline,
    pub portal: wgpu::RenderPipeline,
    pub grass: wgpu::RenderPipeline,
    pub fireflies: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        target: basic::RenderTarget,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            baked: baked::mk_baked_pipeline(device, target, camera_layout),
            color: color::mk_color_pipeline(device, target, camera_layout),
            portal: portal::mk_portal_pipeline(device, target, camera_layout),
            grass: grass::mk_grass_pipeline(device, target, camera_layout),
            fireflies: fireflies::mk_fireflies_pipeline(device, target, camera_layout),
        }
    }
}
