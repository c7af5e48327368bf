use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3};
use instant::Duration;
use portal_scene::camera::{
    AutoOrbit, Camera, CameraUniform, OrbitController, Projection, Spherical,
};

use winit::event::{DeviceId, MouseScrollDelta, TouchPhase, WindowEvent};

const FRAME: Duration = Duration::from_micros(16_667);

fn assert_close(a: Point3<f32>, b: Point3<f32>) {
    assert!((a - b).magnitude() < 1e-3, "{a:?} != {b:?}");
}

#[test]
fn should_convert_offsets_to_spherical_and_back() {
    let offset = Vector3::new(1.5, 2.0, 4.0);
    let spherical = Spherical::from_offset(offset);
    assert!((spherical.radius - offset.magnitude()).abs() < 1e-5);
    assert!((spherical.to_offset() - offset).magnitude() < 1e-5);

    let degenerate = Spherical::from_offset(Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(degenerate.radius, 0.0);
}

#[test]
fn should_orbit_around_the_target_when_dragged() {
    let mut camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    let mut controller = OrbitController::new(1.0, 1.0);
    controller.enable_damping = false;
    controller.set_viewport_height(100);

    // A quarter of the viewport height is a quarter turn
    controller.handle_drag(25.0, 0.0);
    controller.update(&mut camera, FRAME);

    assert_close(camera.position, Point3::new(-5.0, 0.0, 0.0));
    assert!((camera.distance() - 5.0).abs() < 1e-4);
    assert!(!controller.is_settling());
}

#[test]
fn should_spread_rotation_over_frames_when_damped() {
    let mut camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    let mut controller = OrbitController::new(1.0, 1.0);
    controller.set_viewport_height(100);
    controller.handle_drag(25.0, 0.0);

    controller.update(&mut camera, FRAME);
    assert!(controller.is_settling());
    let after_one = Spherical::from_offset(camera.position - camera.target).theta;
    assert!(after_one < 0.0 && after_one > -PI / 2.0 * 0.1);

    for _ in 0..600 {
        controller.update(&mut camera, FRAME);
    }
    assert!(!controller.is_settling());
    assert_close(camera.position, Point3::new(-5.0, 0.0, 0.0));
}

#[test]
fn should_never_flip_over_the_poles() {
    let mut camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    let mut controller = OrbitController::new(1.0, 1.0);
    controller.enable_damping = false;
    controller.set_viewport_height(100);

    controller.handle_drag(0.0, 10_000.0);
    controller.update(&mut camera, FRAME);
    let spherical = Spherical::from_offset(camera.position - camera.target);
    assert!(spherical.phi > 0.0 && spherical.phi < PI);
    assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
}

#[test]
fn should_zoom_within_limits() {
    let mut camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    let mut controller = OrbitController::new(1.0, 1.0);

    controller.handle_scroll(1.0);
    controller.update(&mut camera, FRAME);
    assert!((camera.distance() - 4.75).abs() < 1e-4);

    controller.handle_scroll(-1000.0);
    controller.update(&mut camera, FRAME);
    assert!((camera.distance() - controller.max_distance).abs() < 1e-3);

    controller.handle_scroll(1000.0);
    controller.update(&mut camera, FRAME);
    assert!((camera.distance() - controller.min_distance).abs() < 1e-4);
}

#[test]
fn should_ignore_the_wheel_while_disabled() {
    let mut camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    let mut controller = OrbitController::new(1.0, 1.0);
    let wheel = WindowEvent::MouseWheel {
        // SAFETY: the id is only compared, never used to reach a device
        device_id: unsafe { DeviceId::dummy() },
        delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        phase: TouchPhase::Moved,
    };

    controller.set_enabled(false);
    assert!(!controller.is_enabled());
    controller.handle_window_events(&wheel);
    controller.update(&mut camera, FRAME);
    assert!((camera.distance() - 5.0).abs() < 1e-4);

    controller.set_enabled(true);
    controller.handle_window_events(&wheel);
    controller.update(&mut camera, FRAME);
    assert!((camera.distance() - 4.75).abs() < 1e-4);
}

#[test]
fn should_circle_the_origin_automatically() {
    let auto_orbit = AutoOrbit::default();
    let mut camera = Camera::new((1.5, 2.0, 4.0), (1.0, 1.0, 1.0));

    auto_orbit.apply(&mut camera, 0.0);
    assert_close(camera.position, Point3::new(5.0, 2.0, 0.0));
    assert_close(camera.target, Point3::new(0.0, 0.0, 0.0));

    // A quarter turn at 0.5 rad/s
    auto_orbit.apply(&mut camera, PI);
    assert_close(camera.position, Point3::new(0.0, 2.0, 5.0));
}

#[test]
fn should_track_the_aspect_ratio() {
    let mut projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);
    assert!((projection.aspect() - 4.0 / 3.0).abs() < 1e-6);
    projection.resize(1000, 500);
    assert_eq!(projection.aspect(), 2.0);
    projection.resize(10, 0);
    assert!(projection.aspect().is_finite());
}

#[test]
fn should_upload_the_camera_position() {
    let camera = Camera::new((1.5, 2.0, 4.0), (0.0, 0.0, 0.0));
    let projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera, &projection);
    assert_eq!(uniform.view_position, [1.5, 2.0, 4.0, 1.0]);
    assert_eq!(std::mem::size_of::<CameraUniform>(), 16 + 3 * 64);
}
