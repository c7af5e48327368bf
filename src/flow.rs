//! Flows and the winit application driving them.
//!
//! The scene is split into flows: the portal model, the grass field, the
//! fireflies and the debug panel. Each flow reacts to input, animates its own
//! uniforms and hands back a [`Render`] describing its draws. [`run`] owns the
//! window, the GPU [`Context`] and one shared state value `S` that every flow
//! reads and writes.
//!
//! Window events reach the flows before the orbit controls, so a flow drawing
//! UI on top of the scene can keep its clicks from moving the camera.
//!
//! Per redraw the app
//! 1. forwards pending window, device and custom events to every flow,
//! 2. advances the clock and calls [`GraphicsFlow::on_update`],
//! 3. steps the orbit camera and uploads it,
//! 4. batches all renders per pipeline and draws them in a fixed order,
//! 5. presents the frame.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::Duration;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::{
    context::{Context, InitContext},
    data_structures::model::DrawMesh,
    pipelines::fireflies::VERTICES_PER_FIREFLY,
    data_structures::texture::MultisampleTexture,
    render::{Batches, MeshDraw, Render},
};

/// What a lifecycle hook asks the app to do next.
///
/// Futures are blocked on natively and spawned on the browser executor on
/// wasm, so a flow never awaits anything itself.
pub enum Out<S, E> {
    /// Resolve the futures and deliver each event to
    /// [`GraphicsFlow::on_custom_events`].
    FutEvent(Vec<Box<dyn Future<Output = E>>>),
    /// Resolve the futures and apply each closure to the shared state.
    FutFn(Vec<Box<dyn Future<Output = Box<dyn FnOnce(&mut S)>>>>),
    /// Change the context right away, e.g. clear colour or camera controls.
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl<S, E> Default for Out<S, E> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Verdict of a flow on an offscreen frame.
#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// One part of the scene.
///
/// `on_init` runs once, after every flow has been constructed. Input hooks run
/// per winit event, `on_update` and `on_render` once per frame.
pub trait GraphicsFlow<S, E> {
    /// Seed the shared state and configure the context.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<S, E>;

    /// Advance animations. `ctx.elapsed` holds the seconds since start.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<S, E>;

    fn on_device_events(&mut self, ctx: &Context, state: &mut S, event: &DeviceEvent) -> Out<S, E>;

    /// `Resized` and `ScaleFactorChanged` arrive after the context was resized.
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent) -> Out<S, E>;

    /// Return `Some(event)` to pass the event on to the next flow, `None` to consume it.
    fn on_custom_events(&mut self, ctx: &Context, state: &mut S, event: E) -> Option<E>;

    fn on_render<'pass>(&self) -> Render<'_, 'pass>;

    /// Inspect the offscreen frame. The app exits once every flow has passed.
    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut S,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>;
}

// `FlowEvent` needs Debug for winit on wasm.
impl<State, Event> Debug for dyn GraphicsFlow<State, Event> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

type FlowFuture<S, E> = Pin<Box<dyn Future<Output = Box<dyn GraphicsFlow<S, E>>>>>;

/// Builds a flow once the GPU is ready. Asset loading happens in here.
pub type FlowConstructor<S, E> = Box<dyn FnOnce(InitContext) -> FlowFuture<S, E>>;

/// Box an async function building a flow into a [`FlowConstructor`].
pub fn flow_constructor<S, E, F, Fut>(constructor: F) -> FlowConstructor<S, E>
where
    F: FnOnce(InitContext) -> Fut + 'static,
    Fut: Future<Output = Box<dyn GraphicsFlow<S, E>>> + 'static,
{
    Box::new(move |ctx| -> FlowFuture<S, E> { Box::pin(constructor(ctx)) })
}

pub(crate) enum FlowEvent<State: 'static, Event: 'static> {
    /// Context and flows built asynchronously on wasm.
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State, Event>>>,
    },
    /// A resolved `Out::FutFn` closure on wasm.
    #[allow(dead_code)]
    Mut(Box<dyn FnOnce(&mut State)>),
    Custom(Event),
    /// Sent by the offscreen test path once every flow passed.
    #[allow(dead_code)]
    Exit,
}

impl<State, Event> Debug for FlowEvent<State, Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { flows, .. } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Mut(_) => f.write_str("Mut(..)"),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

/// GPU context plus the shared scene state.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        Ok(Self {
            ctx: Context::new(window).await?,
            state: State::default(),
            is_surface_configured: false,
        })
    }
}

impl<State: 'static> AppState<State> {
    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn resize_to_window(&mut self) {
        let size = self.ctx.window.inner_size();
        self.resize(size.width, size.height);
    }

    fn render<Event: 'static>(
        &mut self,
        flows: &mut [Box<dyn GraphicsFlow<State, Event>>],
        #[cfg(feature = "integration-tests")] sink: &OutputSink<State, Event>,
    ) -> Result<(), wgpu::CurrentSurfaceTexture> {
        self.ctx.window.request_redraw();
        if !self.is_surface_configured {
            return Ok(());
        }

        let frame = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(frame)
            | wgpu::CurrentSurfaceTexture::Suboptimal(frame) => frame,
            other => return Err(other),
        };
        #[cfg(feature = "integration-tests")]
        let capture = Capture::new(&self.ctx);
        #[cfg(feature = "integration-tests")]
        let (msaa, resolved, depth_view) = (
            capture.msaa.as_ref(),
            &capture.color_view,
            &capture.depth.view,
        );
        #[cfg(not(feature = "integration-tests"))]
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        #[cfg(not(feature = "integration-tests"))]
        let (msaa, resolved, depth_view) = (
            self.ctx.msaa_texture.as_ref(),
            &frame_view,
            &self.ctx.depth_texture.view,
        );
        let (color_view, resolve_target) = MultisampleTexture::attachment(msaa, resolved);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            let mut batches = Batches::default();
            for flow in flows.iter() {
                flow.on_render().set_pipelines(&mut batches);
            }
            draw_scene(&mut pass, &self.ctx, batches);
        }

        #[cfg(feature = "integration-tests")]
        capture.copy(&mut encoder);

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        self.check_frame(flows, sink, &capture);

        frame.present();
        Ok(())
    }

    /// Hand the captured frame to every flow and exit once all of them passed.
    #[cfg(feature = "integration-tests")]
    fn check_frame<Event: 'static>(
        &mut self,
        flows: &mut [Box<dyn GraphicsFlow<State, Event>>],
        sink: &OutputSink<State, Event>,
        capture: &Capture,
    ) {
        let mut image = match sink.runtime.block_on(capture.read(&self.ctx.device)) {
            Ok(image) => image,
            Err(e) => panic!("could not read back the frame: {e:#}"),
        };
        let mut all_passed = true;
        for flow in flows.iter_mut() {
            match flow.render_to_texture(&self.ctx, &mut self.state, &mut image) {
                Ok(ImageTestResult::Passed) => (),
                Ok(ImageTestResult::Waiting) => all_passed = false,
                Ok(ImageTestResult::Failed) => panic!("frame assertion failed"),
                Err(e) => panic!("{e}"),
            }
        }
        if all_passed && sink.proxy.send_event(FlowEvent::Exit).is_err() {
            panic!("every frame assertion passed but the event loop is already gone");
        }
    }
}

/// Draw order: baked meshes, pole lights, grass, portal, then the additive
/// fireflies, which neither write depth nor occlude anything.
fn draw_scene<'a>(pass: &mut wgpu::RenderPass<'a>, ctx: &'a Context, batches: Batches<'a, 'a>) {
    let camera = ctx.camera.bind_group();

    pass.set_pipeline(&ctx.pipelines.baked);
    draw_meshes(pass, &batches.baked, camera);

    pass.set_pipeline(&ctx.pipelines.color);
    draw_meshes(pass, &batches.colors, camera);

    pass.set_pipeline(&ctx.pipelines.grass);
    for grass in batches.grass.iter().filter(|grass| grass.amount > 0) {
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, grass.group, &[]);
        pass.set_vertex_buffer(0, grass.vertex.slice(..));
        pass.set_index_buffer(grass.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..grass.amount, 0, 0..1);
    }

    pass.set_pipeline(&ctx.pipelines.portal);
    draw_meshes(pass, &batches.portals, camera);

    pass.set_pipeline(&ctx.pipelines.fireflies);
    for swarm in batches.particles.iter().filter(|swarm| swarm.amount > 0) {
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, swarm.group, &[]);
        pass.set_vertex_buffer(0, swarm.instance.slice(..));
        pass.draw(0..VERTICES_PER_FIREFLY, 0..swarm.amount);
    }

    for custom in batches.custom {
        custom(ctx, pass);
    }
}

fn draw_meshes<'a>(
    pass: &mut wgpu::RenderPass<'a>,
    draws: &[MeshDraw<'a>],
    camera: &'a wgpu::BindGroup,
) {
    for draw in draws.iter().filter(|draw| draw.mesh.num_elements > 0) {
        pass.set_vertex_buffer(1, draw.instance.slice(..));
        pass.draw_mesh_instanced(draw.mesh, draw.material, 0..1, camera);
    }
}

/// Offscreen targets with the same sample count as the surface, the resolved
/// colour texture and the buffer the frame is copied into.
#[cfg(feature = "integration-tests")]
struct Capture {
    texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    msaa: Option<MultisampleTexture>,
    depth: crate::data_structures::texture::DepthTexture,
    buffer: wgpu::Buffer,
    extent: wgpu::Extent3d,
}

#[cfg(feature = "integration-tests")]
impl Capture {
    const BYTES_PER_PIXEL: u32 = 4;

    fn new(ctx: &Context) -> Self {
        // Copied rows must be a multiple of 256 bytes, i.e. 64 pixels.
        let extent = wgpu::Extent3d {
            width: ctx.config.width.div_ceil(64) * 64,
            height: ctx.config.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("capture_color"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.target.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let sample_count = ctx.target.sample_count;
        let msaa = MultisampleTexture::new(
            &ctx.device,
            ctx.target.format,
            extent.width,
            extent.height,
            sample_count,
        );
        let depth = crate::data_structures::texture::DepthTexture::new(
            &ctx.device,
            extent.width,
            extent.height,
            sample_count,
        );
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture_buffer"),
            size: (Self::BYTES_PER_PIXEL * extent.width * extent.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            color_view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            msaa,
            depth,
            texture,
            buffer,
            extent,
        }
    }

    fn copy(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(Self::BYTES_PER_PIXEL * self.extent.width),
                    rows_per_image: Some(self.extent.height),
                },
            },
            self.extent,
        );
    }

    async fn read(
        &self,
        device: &wgpu::Device,
    ) -> anyhow::Result<image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>> {
        use anyhow::Context as _;

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let slice = self.buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .map_err(|e| anyhow::anyhow!("device poll failed: {e}"))?;
        rx.receive()
            .await
            .context("mapping callback dropped")??;
        image::ImageBuffer::from_raw(
            self.extent.width,
            self.extent.height,
            slice.get_mapped_range(),
        )
        .context("captured buffer is smaller than the frame")
    }
}

/// Applies the [`Out`] values returned by flow hooks.
pub(crate) struct OutputSink<State: 'static, Event: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent<State, Event>>,
}

impl<State: 'static, Event: 'static> OutputSink<State, Event> {
    /// Call `hook` on every flow in order, applying each output before the
    /// next flow runs.
    fn dispatch(
        &self,
        flows: &mut [Box<dyn GraphicsFlow<State, Event>>],
        app: &mut AppState<State>,
        mut hook: impl FnMut(
            &mut dyn GraphicsFlow<State, Event>,
            &mut Context,
            &mut State,
        ) -> Out<State, Event>,
    ) {
        for flow in flows.iter_mut() {
            let out = hook(flow.as_mut(), &mut app.ctx, &mut app.state);
            self.apply(out, &mut app.ctx, &mut app.state);
        }
    }

    fn apply(&self, out: Out<State, Event>, ctx: &mut Context, state: &mut State) {
        match out {
            Out::FutEvent(futures) => {
                let events = futures::future::join_all(futures.into_iter().map(Pin::from));
                #[cfg(not(target_arch = "wasm32"))]
                for event in self.runtime.block_on(events) {
                    if let Err(e) = self.proxy.send_event(FlowEvent::Custom(event)) {
                        log::error!("event loop closed with events pending: {e}");
                        break;
                    }
                }
                #[cfg(target_arch = "wasm32")]
                {
                    let proxy = self.proxy.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        for event in events.await {
                            if proxy.send_event(FlowEvent::Custom(event)).is_err() {
                                log::error!("event loop closed with events pending");
                                break;
                            }
                        }
                    });
                }
            }
            Out::FutFn(futures) => {
                let mutations = futures::future::join_all(futures.into_iter().map(Pin::from));
                #[cfg(not(target_arch = "wasm32"))]
                for mutation in self.runtime.block_on(mutations) {
                    mutation(state);
                }
                // No blocking in the browser: mutations come back as events.
                #[cfg(target_arch = "wasm32")]
                {
                    let _ = state;
                    let proxy = self.proxy.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        for mutation in mutations.await {
                            if proxy.send_event(FlowEvent::Mut(mutation)).is_err() {
                                log::error!("event loop closed with state mutations pending");
                                break;
                            }
                        }
                    });
                }
            }
            Out::Configure(configure) => configure(ctx),
            Out::Empty => (),
        }
    }
}

pub struct App<State: 'static, Event: 'static> {
    sink: OutputSink<State, Event>,
    state: Option<AppState<State>>,
    flows: Vec<Box<dyn GraphicsFlow<State, Event>>>,
    /// Taken on the first `resumed`.
    constructors: Option<Vec<FlowConstructor<State, Event>>>,
}

impl<State: 'static + Default, Event: 'static> App<State, Event> {
    fn new(
        event_loop: &EventLoop<FlowEvent<State, Event>>,
        constructors: Vec<FlowConstructor<State, Event>>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            sink: OutputSink {
                #[cfg(not(target_arch = "wasm32"))]
                runtime: tokio::runtime::Runtime::new()?,
                proxy: event_loop.create_proxy(),
            },
            state: None,
            flows: Vec::new(),
            constructors: Some(constructors),
        })
    }

    fn start(&mut self, mut app: AppState<State>, flows: Vec<Box<dyn GraphicsFlow<State, Event>>>) {
        app.resize_to_window();
        self.flows = flows;
        self.sink
            .dispatch(&mut self.flows, &mut app, |flow, ctx, state| flow.on_init(ctx, state));
        app.ctx.window.request_redraw();
        log::info!("{} flows running", self.flows.len());
        self.state = Some(app);
    }

    fn window_attributes() -> winit::window::WindowAttributes {
        #[allow(unused_mut)]
        let mut attributes = Window::default_attributes().with_title("Portal");
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("canvas"))
                .map(|element| element.unchecked_into());
            if canvas.is_none() {
                log::warn!("no #canvas element, winit creates its own");
            }
            attributes = attributes.with_canvas(canvas);
        }
        attributes
    }
}

impl<State: 'static + Default, Event: 'static> ApplicationHandler<FlowEvent<State, Event>>
    for App<State, Event>
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Some platforms resume more than once.
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        let window = match event_loop.create_window(Self::window_attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        let init = async move {
            let app = AppState::<State>::new(window).await?;
            let pending = constructors
                .into_iter()
                .map(|constructor| constructor((&app.ctx).into()));
            let flows = futures::future::join_all(pending).await;
            anyhow::Ok((app, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        match self.sink.runtime.block_on(init) {
            Ok((app, flows)) => self.start(app, flows),
            Err(e) => {
                log::error!("initialization failed: {e:#}");
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.sink.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init.await {
                    Ok((state, flows)) => {
                        if proxy
                            .send_event(FlowEvent::Initialized { state, flows })
                            .is_err()
                        {
                            log::error!("event loop closed before the scene was ready");
                        }
                    }
                    Err(e) => log::error!("initialization failed: {e:#}"),
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State, Event>) {
        match event {
            FlowEvent::Initialized { state, flows } => self.start(state, flows),
            FlowEvent::Custom(event) => {
                let Some(app) = self.state.as_mut() else {
                    return;
                };
                let unconsumed = self.flows.iter_mut().try_fold(event, |event, flow| {
                    flow.on_custom_events(&app.ctx, &mut app.state, event)
                });
                if unconsumed.is_some() {
                    log::warn!("no flow consumed a custom event");
                }
            }
            FlowEvent::Mut(mutation) => {
                if let Some(app) = self.state.as_mut() {
                    mutation(&mut app.state);
                }
            }
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        let Some(app) = self.state.as_mut() else {
            return;
        };
        self.sink.dispatch(&mut self.flows, app, |flow, ctx, state| {
            flow.on_device_events(ctx, state, &event)
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Some(app) = self.state.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::Resized(size) => app.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => app.resize_to_window(),
            _ => (),
        }

        // Flows see the event first and may disable the camera controls for it
        self.sink.dispatch(&mut self.flows, app, |flow, ctx, state| {
            flow.on_window_events(ctx, state, &event)
        });
        app.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                let dt = app.ctx.advance_clock();
                self.sink.dispatch(&mut self.flows, app, |flow, ctx, state| {
                    flow.on_update(ctx, state, dt)
                });
                app.ctx.update_camera(dt);

                let rendered = app.render(
                    &mut self.flows,
                    #[cfg(feature = "integration-tests")]
                    &self.sink,
                );
                match rendered {
                    Ok(()) => (),
                    Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                        app.resize_to_window();
                    }
                    Err(e) => log::error!("frame skipped: {e:?}"),
                }
            }
            _ => (),
        }
    }
}

fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("could not initialize the logger: {e}");
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("could not initialize the logger: {e}").into());
        }
    }
}

/// Create the window and run `constructors` until the window is closed.
pub fn run<State: 'static + Default, Event: 'static>(
    constructors: Vec<FlowConstructor<State, Event>>,
) -> anyhow::Result<()> {
    init_logger();

    // The offscreen tests run the event loop off the main thread.
    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoop::with_user_event().with_any_thread(true).build()?
    };
    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop = {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        EventLoop::with_user_event().with_any_thread(true).build()?
    };
    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop = EventLoop::with_user_event().build()?;

    let mut app = App::<State, Event>::new(&event_loop, constructors)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
