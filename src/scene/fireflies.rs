use instant::Duration;
use rand::{SeedableRng, rngs::StdRng};
use wgpu::util::DeviceExt;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    config::SceneConfig,
    context::{Context, InitContext},
    data_structures::fireflies::{FireflyRaw, scatter_fireflies},
    flow::{GraphicsFlow, Out},
    pipelines::{
        fireflies::{FirefliesUniform, mk_fireflies_uniform},
        uniform::UniformResources,
    },
    render::{Particles, Render},
    scene::SceneState,
};

/// Glowing specks floating above the ground.
pub struct Fireflies {
    fireflies: Vec<FireflyRaw>,
    instance_buffer: wgpu::Buffer,
    uniform: UniformResources<FirefliesUniform>,
}

impl Fireflies {
    pub fn new(ctx: &InitContext, config: &SceneConfig) -> Self {
        let mut rng = match config.firefly_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let fireflies = scatter_fireflies(config.firefly_count, &mut rng);
        log::info!("Spawned {} fireflies", fireflies.len());

        let instance_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Firefly Instance Buffer"),
                contents: bytemuck::cast_slice(&fireflies),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uniform = mk_fireflies_uniform(
            &ctx.device,
            FirefliesUniform::new(
                config.firefly_size,
                ctx.pixel_ratio,
                [ctx.config.width as f32, ctx.config.height as f32],
            ),
        );
        Self {
            fireflies,
            instance_buffer,
            uniform,
        }
    }

    pub fn fireflies(&self) -> &[FireflyRaw] {
        &self.fireflies
    }
}

impl GraphicsFlow<SceneState, ()> for Fireflies {
    fn on_init(&mut self, _: &mut Context, _: &mut SceneState) -> Out<SceneState, ()> {
        Out::Empty
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut SceneState,
        _: Duration,
    ) -> Out<SceneState, ()> {
        self.uniform.uniform.time = ctx.elapsed;
        self.uniform.uniform.size = state.firefly_size;
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
        ctx: &Context,
        _: &mut SceneState,
        event: &WindowEvent,
    ) -> Out<SceneState, ()> {
        if let WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } = event {
            // The context is already resized
            self.uniform.uniform.pixel_ratio = ctx.pixel_ratio;
            self.uniform.uniform.resolution =
                [ctx.config.width as f32, ctx.config.height as f32];
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut SceneState, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        if self.fireflies.is_empty() {
            return Render::None;
        }
        Render::Particles(Particles {
            instance: &self.instance_buffer,
            group: &self.uniform.bind_group,
            amount: self.fireflies.len() as u32,
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
