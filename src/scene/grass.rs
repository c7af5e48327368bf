use instant::Duration;
use wgpu::util::DeviceExt;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    context::{Context, InitContext},
    data_structures::grass::{self, GrassConfig, GrassMesh},
    flow::{GraphicsFlow, Out},
    pipelines::{
        grass::{GrassUniform, mk_grass_uniform},
        uniform::UniformResources,
    },
    render::{Flat, Render},
    scene::SceneState,
};

/// The procedural grass field, one merged mesh for all blades.
pub struct Grass {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
    uniform: UniformResources<GrassUniform>,
}

impl Grass {
    /// Generate and upload the field. An invalid config is logged and leaves
    /// the field empty.
    pub fn new(ctx: &InitContext, config: &GrassConfig) -> Self {
        let mesh = grass::generate(config).unwrap_or_else(|e| {
            log::error!("Could not generate the grass field: {e:#}");
            GrassMesh::default()
        });

        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Grass Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Grass Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: mesh.indices.len() as u32,
            uniform: mk_grass_uniform(&ctx.device),
        }
    }
}

impl GraphicsFlow<SceneState, ()> for Grass {
    fn on_init(&mut self, _: &mut Context, _: &mut SceneState) -> Out<SceneState, ()> {
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut SceneState, _: Duration) -> Out<SceneState, ()> {
        self.uniform.uniform.time = ctx.elapsed;
        self.uniform.write(&ctx.queue);
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut SceneState,
        _: &DeviceEvent,
    ) -> Out<SceneState, ()> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut SceneState,
        _: &WindowEvent,
    ) -> Out<SceneState, ()> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut SceneState, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        if self.num_indices == 0 {
            return Render::None;
        }
        Render::Grass(Flat {
            vertex: &self.vertex_buffer,
            index: &self.index_buffer,
            group: &self.uniform.bind_group,
            amount: self.num_indices,
        })
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut SceneState,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        Ok(crate::flow::ImageTestResult::Passed)
    }
}
