//! The portal scene: the flows it is made of and the state they share.
//!
//! - `portal` loads the baked texture and the glTF model and animates the portal
//! - `axe` re-parents the axe into a group and swings it
//! - `fireflies` and `grass` draw the procedural parts of the scene
//! - `debug` is the egui tweak panel drawn over everything else

use crate::{
    config::SceneConfig,
    context::InitContext,
    data_structures::color::Color,
    flow::{FlowConstructor, GraphicsFlow, flow_constructor},
};

pub mod axe;
pub mod debug;
pub mod fireflies;
pub mod grass;
pub mod portal;

/// Parameters that can be tweaked at runtime from the debug panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    /// Portal swirl colour.
    pub fill_color: Color,
    /// Portal rim colour.
    pub glow_color: Color,
    pub firefly_size: f32,
    pub clear_color: Color,
}

impl SceneState {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            fill_color: config.fill_color,
            glow_color: config.glow_color,
            firefly_size: config.firefly_size,
            clear_color: config.clear_color,
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

type SceneFlow = Box<dyn GraphicsFlow<SceneState, ()>>;

/// All flows of the scene. The portal scene comes first, its `on_init` seeds
/// the shared state from `config`.
pub fn constructors(config: SceneConfig) -> Vec<FlowConstructor<SceneState, ()>> {
    let portal_config = config.clone();
    let firefly_config = config.clone();
    let grass_config = config.grass.clone();
    let debug_config = config;

    vec![
        flow_constructor(move |ctx: InitContext| async move {
            Box::new(portal::PortalScene::new(ctx, portal_config).await) as SceneFlow
        }),
        flow_constructor(move |ctx: InitContext| async move {
            Box::new(fireflies::Fireflies::new(&ctx, &firefly_config)) as SceneFlow
        }),
        flow_constructor(move |ctx: InitContext| async move {
            Box::new(grass::Grass::new(&ctx, &grass_config)) as SceneFlow
        }),
        flow_constructor(move |ctx: InitContext| async move {
            Box::new(debug::DebugPanel::new(&ctx, &debug_config)) as SceneFlow
        }),
    ]
}
