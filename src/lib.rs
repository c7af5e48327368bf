//! portal-scene
//!
//! An interactive 3D scene rendered with wgpu on native and WASM: a baked
//! environment loaded from glTF, a glowing animated portal, a swinging axe,
//! procedural grass swaying in the wind and additive fireflies. The camera
//! orbits the scene and an egui debug panel tweaks colours and sizes at
//! runtime.
//!
//! High-level modules
//! - `camera`: camera, projection, orbit controls and the automatic orbit
//! - `clock`: frame timing
//! - `config`: scene configuration and its defaults
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, instances, textures, the scene graph, grass and fireflies
//! - `flow`: the flow lifecycle and the event loop
//! - `pipelines`: render pipelines (baked, colour, portal, grass, fireflies)
//! - `resources`: helpers to load textures and the glTF scene
//! - `render`: render composition for efficient pipeline reuse
//! - `scene`: the flows making up the portal scene
//!

pub mod camera;
pub mod clock;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use config::SceneConfig;

/// Run the scene with the default configuration.
pub fn run() -> anyhow::Result<()> {
    run_with_config(SceneConfig::default())
}

/// Validate `config` and run the scene until the window is closed.
pub fn run_with_config(config: SceneConfig) -> anyhow::Result<()> {
    config.validate()?;
    flow::run(scene::constructors(config))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run().map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
