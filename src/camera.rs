//! Camera, projection, orbit controls and the automatic orbit.
//!
//! The camera starts at (1.5, 2, 4) looking at the origin with a 45° vertical
//! field of view. Each frame the [`OrbitController`] applies the user's drag and
//! zoom input (with damping), after which the [`AutoOrbit`] moves the camera on
//! a circle of radius 5 around the scene and points it back at the origin.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::{
    config::CameraConfig,
    pipelines::{basic::mk_uniform_layout, uniform::UniformResources},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keeps the polar angle away from the poles where `look_at` degenerates.
const POLAR_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn look_at<T: Into<Point3<f32>>>(&mut self, target: T) {
        self.target = target.into();
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Distance from the camera to its target.
    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

// The matrices are column-major [[f32; 4]; 4] so the layout matches WGSL mat4x4.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        let view = camera.calc_matrix();
        let proj = projection.calc_matrix();
        self.view = view.into();
        self.proj = proj.into();
        self.view_proj = (proj * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Spherical coordinates around the orbit target, y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle from the +y axis.
    pub phi: f32,
    /// Azimuth around the y axis, measured from +z towards +x.
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vector3<f32>) -> Self {
        let radius = offset.magnitude();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(&self) -> Vector3<f32> {
        let sin_phi = self.phi.sin();
        Vector3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Drag-to-rotate and wheel-to-zoom around the camera target, with damping.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_damping: bool,
    /// Share of the pending rotation applied per 60 Hz frame.
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_theta: f32,
    pending_phi: f32,
    zoom_scale: f32,
    dragging: bool,
    enabled: bool,
    cursor: Option<PhysicalPosition<f64>>,
    viewport_height: f32,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 0.5,
            max_distance: 50.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            zoom_scale: 1.0,
            dragging: false,
            enabled: true,
            cursor: None,
            viewport_height: 1.0,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// While disabled, presses and wheel turns are left to whatever sits on
    /// top of the scene (the debug panel). A drag in progress is dropped.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dragging = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue a rotation; `dx`/`dy` are pointer deltas in physical pixels.
    pub fn handle_drag(&mut self, dx: f64, dy: f64) {
        // A drag across the full viewport height turns the camera once around
        let per_pixel = 2.0 * PI * self.rotate_speed / self.viewport_height;
        self.pending_theta -= dx as f32 * per_pixel;
        self.pending_phi -= dy as f32 * per_pixel;
    }

    /// Queue a zoom; positive `lines` move the camera closer.
    pub fn handle_scroll(&mut self, lines: f32) {
        self.zoom_scale *= 0.95_f32.powf(self.zoom_speed * lines);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { .. } | WindowEvent::MouseWheel { .. } if !self.enabled => (),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.cursor) {
                    self.handle_drag(position.x - last.x, position.y - last.y);
                }
                self.cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 100.0,
                };
                self.handle_scroll(lines);
            }
            _ => (),
        }
    }

    /// Whether rotation input is still being played out by the damping.
    pub fn is_settling(&self) -> bool {
        self.pending_theta.abs() > 1e-5 || self.pending_phi.abs() > 1e-5
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let mut spherical = Spherical::from_offset(camera.position - camera.target);

        let applied = if self.enable_damping {
            // Frame-rate independent version of "apply `damping_factor` per frame"
            let frames = dt.as_secs_f32() * 60.0;
            1.0 - (1.0 - self.damping_factor).powf(frames)
        } else {
            1.0
        };
        spherical.theta += self.pending_theta * applied;
        spherical.phi += self.pending_phi * applied;
        self.pending_theta *= 1.0 - applied;
        self.pending_phi *= 1.0 - applied;

        spherical.phi = spherical.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius =
            (spherical.radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.zoom_scale = 1.0;

        camera.position = camera.target + spherical.to_offset();
    }
}

/// Circles the camera around the origin, independent of user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoOrbit {
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
}

impl Default for AutoOrbit {
    fn default() -> Self {
        Self {
            radius: 5.0,
            angular_speed: 0.5,
        }
    }
}

impl AutoOrbit {
    /// Overwrite the camera's x/z position for `elapsed` seconds and look at the
    /// origin. The height stays whatever the orbit controls left it at.
    pub fn apply(&self, camera: &mut Camera, elapsed: f32) {
        let angle = elapsed * self.angular_speed;
        camera.position.x = angle.cos() * self.radius;
        camera.position.z = angle.sin() * self.radius;
        camera.look_at((0.0, 0.0, 0.0));
    }
}

/// The camera with its controls and the GPU uniform shared by every pipeline
/// as bind group 0.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub auto_orbit: Option<AutoOrbit>,
    pub uniform: UniformResources<CameraUniform>,
    pub layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        config: &CameraConfig,
        projection: &Projection,
        viewport_height: u32,
    ) -> Self {
        let camera = Camera::new(config.position, (0.0, 0.0, 0.0));
        let mut controller = OrbitController::new(1.0, 1.0);
        controller.set_viewport_height(viewport_height);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);
        let layout = mk_bind_group_layout(device);
        Self {
            uniform: UniformResources::new(device, &layout, uniform, "camera"),
            camera,
            controller,
            auto_orbit: config.auto_orbit,
            layout,
        }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.uniform.bind_group
    }

    /// Run the controls for this frame and upload the new matrices.
    pub fn update(
        &mut self,
        projection: &Projection,
        queue: &wgpu::Queue,
        elapsed: f32,
        dt: Duration,
    ) {
        self.controller.update(&mut self.camera, dt);
        if let Some(auto_orbit) = &self.auto_orbit {
            auto_orbit.apply(&mut self.camera, elapsed);
        }
        self.uniform.uniform.update_view_proj(&self.camera, projection);
        self.uniform.write(queue);
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    mk_uniform_layout(
        device,
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        "camera_bind_group_layout",
    )
}
