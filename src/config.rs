//! Scene configuration.
//!
//! All tunables of the portal scene in one place. The defaults reproduce the
//! authored scene; tests and embedders override single fields with struct
//! update syntax and call [`SceneConfig::validate`] before running.

use anyhow::{Context as _, ensure};

use crate::{
    camera::AutoOrbit,
    data_structures::{color::Color, grass::GrassConfig},
};

pub const BAKED_TEXTURE: &str = "baked.jpg";
pub const SCENE_MODEL: &str = "PortalScene.glb";

/// Portal colours: the swirl inside and the glow around the rim.
pub const FILL_COLOR: u32 = 0x1c7f8d;
pub const GLOW_COLOR: u32 = 0xbef5f5;
pub const POLE_LIGHT_COLOR: u32 = 0xffffe5;
pub const CLEAR_COLOR: u32 = 0x1a1a1a;

pub const FIREFLY_COUNT: usize = 35;
pub const FIREFLY_SIZE: f32 = 140.0;
pub const FIREFLY_SIZE_RANGE: (f32, f32) = (0.0, 200.0);

/// The scale factor is capped so that high-density screens don't quadruple the fill rate.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub auto_orbit: Option<AutoOrbit>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [1.5, 2.0, 4.0],
            fovy_degrees: 45.0,
            znear: 0.1,
            zfar: 100.0,
            auto_orbit: Some(AutoOrbit::default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub baked_texture: String,
    pub scene_model: String,
    pub fill_color: Color,
    pub glow_color: Color,
    pub pole_light_color: Color,
    pub clear_color: Color,
    pub firefly_count: usize,
    pub firefly_size: f32,
    /// Seed for the firefly layout; `None` picks a fresh layout every run.
    pub firefly_seed: Option<u64>,
    pub grass: GrassConfig,
    pub camera: CameraConfig,
    /// Whether the debug panel starts opened.
    pub debug_panel_open: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            baked_texture: BAKED_TEXTURE.to_string(),
            scene_model: SCENE_MODEL.to_string(),
            fill_color: Color::from_hex(FILL_COLOR),
            glow_color: Color::from_hex(GLOW_COLOR),
            pole_light_color: Color::from_hex(POLE_LIGHT_COLOR),
            clear_color: Color::from_hex(CLEAR_COLOR),
            firefly_count: FIREFLY_COUNT,
            firefly_size: FIREFLY_SIZE,
            firefly_seed: None,
            grass: GrassConfig::default(),
            camera: CameraConfig::default(),
            debug_panel_open: false,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.baked_texture.is_empty(), "baked texture name is empty");
        ensure!(!self.scene_model.is_empty(), "scene model name is empty");
        let (min, max) = FIREFLY_SIZE_RANGE;
        ensure!(
            (min..=max).contains(&self.firefly_size),
            "firefly size {} outside of [{min}, {max}]",
            self.firefly_size
        );
        let camera = &self.camera;
        ensure!(
            camera.fovy_degrees > 0.0 && camera.fovy_degrees < 180.0,
            "field of view must lie in (0, 180) degrees, got {}",
            camera.fovy_degrees
        );
        ensure!(
            camera.znear > 0.0 && camera.znear < camera.zfar,
            "invalid clip planes near={} far={}",
            camera.znear,
            camera.zfar
        );
        if let Some(auto_orbit) = &camera.auto_orbit {
            ensure!(auto_orbit.radius > 0.0, "auto orbit radius must be positive");
        }
        self.grass.validate().context("invalid grass configuration")?;
        Ok(())
    }
}

/// `min(scale_factor, 2)`, the pixel ratio used for rendering and firefly sizes.
pub fn pixel_ratio(scale_factor: f64) -> f32 {
    (scale_factor as f32).min(MAX_PIXEL_RATIO)
}

/// Drawing buffer of a window `width`x`height` physical pixels large when it
/// is rendered at [`pixel_ratio`] rather than at the full `scale_factor`.
pub fn surface_size(width: u32, height: u32, scale_factor: f64) -> [u32; 2] {
    let scale = pixel_ratio(scale_factor) as f64 / scale_factor;
    if !scale.is_finite() || scale >= 1.0 {
        return [width, height];
    }
    let fit = |side: u32| ((side as f64 * scale).round() as u32).max(1);
    [fit(width), fit(height)]
}
