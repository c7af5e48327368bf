use std::sync::Arc;

use anyhow::Context as _;
use instant::Duration;
use winit::window::Window;

use crate::{
    camera::{self, CameraResources, Projection},
    clock::Clock,
    config::{self, CameraConfig},
    data_structures::{
        color::Color,
        texture::{self, DepthTexture, MultisampleTexture},
    },
    pipelines::{Pipelines, basic::RenderTarget},
};

/// Everything a flow needs to build its GPU resources.
///
/// Device and queue are internally reference counted, so cloning them only
/// clones the handle.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub target: RenderTarget,
    pub pixel_ratio: f32,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            config: ctx.config.clone(),
            target: ctx.target,
            pixel_ratio: ctx.pixel_ratio,
        }
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: DepthTexture,
    /// `None` when the adapter cannot multisample the surface format.
    pub(crate) msaa_texture: Option<MultisampleTexture>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub target: RenderTarget,
    pub camera: CameraResources,
    pub projection: Projection,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    /// `min(scale_factor, 2)` of the window.
    pub pixel_ratio: f32,
    /// Seconds since start, sampled once per frame.
    pub elapsed: f32,
    clock: Clock,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let [width, height] = drawing_buffer_size(size.width, size.height, window.scale_factor());

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            })
            .await
            .context("could not open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders output linear colour and rely on an sRGB surface for encoding
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let target = RenderTarget {
            format: surface_format,
            sample_count: texture::pick_sample_count(
                adapter.get_texture_format_features(surface_format).flags,
                adapter.get_texture_format_features(DepthTexture::FORMAT).flags,
            ),
        };
        log::info!("Drawing with {}x MSAA", target.sample_count);

        let camera_config = CameraConfig::default();
        let projection = projection_for(&camera_config, config.width, config.height);
        let camera = CameraResources::new(&device, &camera_config, &projection, config.height);
        let pipelines = Pipelines::new(&device, target, &camera.layout);

        let depth_texture = DepthTexture::new(&device, config.width, config.height, target.sample_count);
        let msaa_texture = MultisampleTexture::new(
            &device,
            target.format,
            config.width,
            config.height,
            target.sample_count,
        );

        let pixel_ratio = config::pixel_ratio(window.scale_factor());

        Ok(Self {
            window,
            depth_texture,
            msaa_texture,
            surface,
            device,
            queue,
            config,
            target,
            camera,
            projection,
            pipelines,
            clear_colour: Color::from_hex(config::CLEAR_COLOR).to_wgpu(),
            pixel_ratio,
            elapsed: 0.0,
            clock: Clock::new(),
        })
    }

    /// Reconfigure the surface and everything sized after it for a window of
    /// `width`x`height` physical pixels. Zero sizes (minimised windows) are
    /// ignored and reported as `false`.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let scale_factor = self.window.scale_factor();
        let [width, height] = drawing_buffer_size(width, height, scale_factor);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.projection.resize(width, height);
        self.camera.controller.set_viewport_height(height);
        self.depth_texture = DepthTexture::new(&self.device, width, height, self.target.sample_count);
        self.msaa_texture = MultisampleTexture::new(
            &self.device,
            self.target.format,
            width,
            height,
            self.target.sample_count,
        );
        self.pixel_ratio = config::pixel_ratio(scale_factor);
        true
    }

    /// Apply a camera configuration, typically from a flow's `on_init`.
    pub fn configure_camera(&mut self, camera_config: &CameraConfig) {
        self.projection = projection_for(camera_config, self.config.width, self.config.height);
        self.camera.camera = camera::Camera::new(camera_config.position, (0.0, 0.0, 0.0));
        self.camera.auto_orbit = camera_config.auto_orbit;
    }

    pub fn set_clear_colour(&mut self, color: Color) {
        self.clear_colour = color.to_wgpu();
    }

    /// Sample the clock for a new frame and return the time since the last one.
    pub(crate) fn advance_clock(&mut self) -> Duration {
        self.elapsed = self.clock.elapsed_time();
        self.clock.delta()
    }

    /// Run the camera controls and upload the camera uniform.
    pub(crate) fn update_camera(&mut self, dt: Duration) {
        self.camera
            .update(&self.projection, &self.queue, self.elapsed, dt);
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

/// The canvas drawing buffer follows the capped pixel ratio. Native swapchains
/// have to match the window, so they keep the full physical size.
fn drawing_buffer_size(width: u32, height: u32, scale_factor: f64) -> [u32; 2] {
    if cfg!(target_arch = "wasm32") {
        config::surface_size(width, height, scale_factor)
    } else {
        [width, height]
    }
}

fn projection_for(camera_config: &CameraConfig, width: u32, height: u32) -> Projection {
    Projection::new(
        width,
        height,
        cgmath::Deg(camera_config.fovy_degrees),
        camera_config.znear,
        camera_config.zfar,
    )
}
