#![allow(dead_code)]

#[cfg(feature = "integration-tests")]
use portal_scene::flow::ImageTestResult;
use portal_scene::{
    context::Context,
    flow::{FlowConstructor, GraphicsFlow, Out},
    render::Render,
};
use winit::event::{DeviceEvent, WindowEvent};

#[cfg(feature = "integration-tests")]
pub(crate) type Validate = Box<
    dyn Fn(
        &Context,
        u32,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

/// Configures the context once and checks every rendered frame.
///
/// Draws nothing itself; pair it with the flows under test.
#[cfg(feature = "integration-tests")]
pub(crate) struct TestRender {
    frames: u32,
    setup: Box<dyn Fn(&mut Context)>,
    validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl TestRender {
    pub(crate) fn new(setup: impl Fn(&mut Context) + 'static, validate: Validate) -> Self {
        Self {
            frames: 0,
            setup: Box::new(setup),
            validate,
        }
    }
}

#[cfg(feature = "integration-tests")]
impl<S> GraphicsFlow<S, ()> for TestRender {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) -> Out<S, ()> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, _: &mut S, _: std::time::Duration) -> Out<S, ()> {
        self.frames += 1;
        Out::Empty
    }

    fn on_device_events(&mut self, _: &Context, _: &mut S, _: &DeviceEvent) -> Out<S, ()> {
        Out::Empty
    }

    fn on_window_events(&mut self, _: &Context, _: &mut S, _: &WindowEvent) -> Out<S, ()> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut S, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::None
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        _: &mut S,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, self.frames, texture)
    }
}

/// Run `constructors` in a window until every flow reports `Passed`.
pub(crate) fn run_golden_test<S: Default + 'static>(constructors: Vec<FlowConstructor<S, ()>>) {
    portal_scene::flow::run(constructors).expect("Failed to run flow for integration test.");
}

pub(crate) fn to_rgba8(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}
