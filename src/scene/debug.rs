//! The debug panel: an egui window drawn on top of the scene.
//!
//! It binds four controls to [`SceneState`]: colour pickers for `fillColor`
//! and `glowColor` (the portal), `clearColor`, and a `fireFlySize` slider
//! stepping by 1 through [`FIREFLY_SIZE_RANGE`]. The window starts collapsed
//! unless [`SceneConfig::debug_panel_open`] is set.
//!
//! Whatever changes the state, the panel or [`DebugPanel::set_color`] called
//! by another flow, the clear colour is pushed to the context on the next
//! update.

use anyhow::{anyhow, bail};
use instant::Duration;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    config::{FIREFLY_SIZE_RANGE, SceneConfig},
    context::{Context, InitContext},
    data_structures::color::Color,
    flow::{GraphicsFlow, Out},
    pipelines::gui::{GuiPainter, ScreenGeometry},
    render::Render,
    scene::SceneState,
};

/// Title of the egui window.
pub const PANEL_TITLE: &str = "Debug";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Color,
    Slider { min: f32, max: f32, step: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub name: &'static str,
    pub kind: ControlKind,
}

pub const CONTROLS: [Control; 4] = [
    Control {
        name: "fillColor",
        kind: ControlKind::Color,
    },
    Control {
        name: "glowColor",
        kind: ControlKind::Color,
    },
    Control {
        name: "fireFlySize",
        kind: ControlKind::Slider {
            min: FIREFLY_SIZE_RANGE.0,
            max: FIREFLY_SIZE_RANGE.1,
            step: 1.0,
        },
    },
    Control {
        name: "clearColor",
        kind: ControlKind::Color,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Color(Color),
    Value(f32),
}

impl std::fmt::Display for ControlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlValue::Color(color) => write!(f, "{color}"),
            ControlValue::Value(value) => write!(f, "{value}"),
        }
    }
}

fn control(name: &str) -> anyhow::Result<&'static Control> {
    CONTROLS
        .iter()
        .find(|control| control.name == name)
        .ok_or_else(|| anyhow!("unknown debug control {name:?}"))
}

fn color_mut<'s>(state: &'s mut SceneState, name: &str) -> Option<&'s mut Color> {
    match name {
        "fillColor" => Some(&mut state.fill_color),
        "glowColor" => Some(&mut state.glow_color),
        "clearColor" => Some(&mut state.clear_color),
        _ => None,
    }
}

/// The controls as the widgets edit them: colours as sRGB bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelValues {
    pub fill_color: [u8; 3],
    pub glow_color: [u8; 3],
    pub firefly_size: f32,
    pub clear_color: [u8; 3],
}

impl PanelValues {
    pub fn from_state(state: &SceneState) -> Self {
        Self {
            fill_color: state.fill_color.to_srgb8(),
            glow_color: state.glow_color.to_srgb8(),
            firefly_size: state.firefly_size,
            clear_color: state.clear_color.to_srgb8(),
        }
    }

    /// Write edited values back and return the names of the controls that
    /// changed. Colours are only replaced when their sRGB bytes differ, so an
    /// untouched control keeps its exact value.
    pub fn apply(&self, state: &mut SceneState) -> Vec<&'static str> {
        let mut changed = Vec::new();
        for (name, rgb) in [
            ("fillColor", self.fill_color),
            ("glowColor", self.glow_color),
            ("clearColor", self.clear_color),
        ] {
            if let Some(color) = color_mut(state, name)
                && color.to_srgb8() != rgb
            {
                let [r, g, b] = rgb;
                *color = Color::from_srgb8(r, g, b);
                changed.push(name);
            }
        }
        let (min, max) = FIREFLY_SIZE_RANGE;
        let size = self.firefly_size.clamp(min, max);
        if size.is_finite() && size != state.firefly_size {
            state.firefly_size = size;
            changed.push("fireFlySize");
        }
        changed
    }

    fn show(&mut self, ctx: &egui::Context, open: bool) {
        egui::Window::new(PANEL_TITLE)
            .default_open(open)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .show(ctx, |ui| {
                egui::Grid::new("debug_controls").num_columns(2).show(ui, |ui| {
                    for control in CONTROLS {
                        ui.label(control.name);
                        match (control.name, control.kind) {
                            (_, ControlKind::Slider { min, max, step }) => {
                                ui.add(
                                    egui::Slider::new(&mut self.firefly_size, min..=max).step_by(step as f64),
                                );
                            }
                            ("fillColor", ControlKind::Color) => {
                                ui.color_edit_button_srgb(&mut self.fill_color);
                            }
                            ("glowColor", ControlKind::Color) => {
                                ui.color_edit_button_srgb(&mut self.glow_color);
                            }
                            (_, ControlKind::Color) => {
                                ui.color_edit_button_srgb(&mut self.clear_color);
                            }
                        }
                        ui.end_row();
                    }
                });
            });
    }
}

/// Remembers the clear colour last pushed to the context.
#[derive(Debug, Clone, Default)]
pub struct ClearColourSync {
    applied: Option<Color>,
}

impl ClearColourSync {
    /// The colour to push, if it differs from the one pushed last.
    pub fn change(&mut self, state: &SceneState) -> Option<Color> {
        if self.applied == Some(state.clear_color) {
            return None;
        }
        self.applied = Some(state.clear_color);
        self.applied
    }

    fn out(&mut self, state: &SceneState) -> Out<SceneState, ()> {
        match self.change(state) {
            Some(color) => Out::Configure(Box::new(move |ctx: &mut Context| ctx.set_clear_colour(color))),
            None => Out::Empty,
        }
    }
}

pub struct DebugPanel {
    open: bool,
    egui: egui::Context,
    /// Created in `on_init`, once there is a window.
    input: Option<egui_winit::State>,
    painter: GuiPainter,
    clear_colour: ClearColourSync,
    /// Whether the orbit controls were last disabled for the panel.
    pointer_captured: bool,
    /// Textures egui released in the frame that was drawn last.
    release: Vec<egui::TextureId>,
}

impl DebugPanel {
    pub fn new(ctx: &InitContext, config: &SceneConfig) -> Self {
        Self {
            open: config.debug_panel_open,
            egui: egui::Context::default(),
            input: None,
            painter: GuiPainter::new(&ctx.device, ctx.target),
            clear_colour: ClearColourSync::default(),
            pointer_captured: false,
            release: Vec::new(),
        }
    }

    /// Current value of the control called `name`.
    pub fn get(state: &SceneState, name: &str) -> anyhow::Result<ControlValue> {
        match name {
            "fillColor" => Ok(ControlValue::Color(state.fill_color)),
            "glowColor" => Ok(ControlValue::Color(state.glow_color)),
            "clearColor" => Ok(ControlValue::Color(state.clear_color)),
            "fireFlySize" => Ok(ControlValue::Value(state.firefly_size)),
            _ => Err(anyhow!("unknown debug control {name:?}")),
        }
    }

    /// Set a colour control from `#rrggbb`.
    pub fn set_color(state: &mut SceneState, name: &str, hex: &str) -> anyhow::Result<()> {
        let control = control(name)?;
        let target = color_mut(state, control.name)
            .ok_or_else(|| anyhow!("{name} is not a colour control"))?;
        *target = Color::from_hex_str(hex)?;
        Ok(())
    }

    /// Set a slider control. Values outside its range are rejected.
    pub fn set_value(state: &mut SceneState, name: &str, value: f32) -> anyhow::Result<()> {
        let control = control(name)?;
        let ControlKind::Slider { min, max, .. } = control.kind else {
            bail!("{name} is not a slider");
        };
        if !value.is_finite() || !(min..=max).contains(&value) {
            bail!("{name} must lie in [{min}, {max}], got {value}");
        }
        state.firefly_size = value;
        Ok(())
    }

    /// Run the egui frame, write edits into `state` and upload what egui drew.
    fn run_ui(&mut self, ctx: &Context, state: &mut SceneState) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        let raw_input = input.take_egui_input(ctx.window());
        let size_in_pixels = [ctx.config.width, ctx.config.height];
        let size_in_points = raw_input.screen_rect.map(|rect| [rect.width(), rect.height()]);

        let mut values = PanelValues::from_state(state);
        let open = self.open;
        let output = self.egui.run(raw_input, |egui_ctx| values.show(egui_ctx, open));
        input.handle_platform_output(ctx.window(), output.platform_output);

        for name in values.apply(state) {
            if let Ok(value) = Self::get(state, name) {
                log::info!("debug: {name} = {value}");
            }
        }

        let screen = ScreenGeometry {
            size_in_points: size_in_points.unwrap_or_else(|| {
                size_in_pixels.map(|side| side as f32 / output.pixels_per_point)
            }),
            size_in_pixels,
        };
        let primitives = self.egui.tessellate(output.shapes, output.pixels_per_point);
        self.painter.free_textures(&std::mem::take(&mut self.release));
        self.painter
            .update_textures(&ctx.device, &ctx.queue, &output.textures_delta.set);
        self.release = output.textures_delta.free;
        self.painter
            .prepare(&ctx.device, &ctx.queue, &primitives, screen);
    }
}

impl GraphicsFlow<SceneState, ()> for DebugPanel {
    fn on_init(&mut self, ctx: &mut Context, state: &mut SceneState) -> Out<SceneState, ()> {
        let window = ctx.window();
        self.input = Some(egui_winit::State::new(
            self.egui.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(ctx.device.limits().max_texture_dimension_2d as usize),
        ));
        self.clear_colour.out(state)
    }

    fn on_update(&mut self, ctx: &Context, state: &mut SceneState, _: Duration) -> Out<SceneState, ()> {
        self.run_ui(ctx, state);
        self.clear_colour.out(state)
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
        let Some(input) = self.input.as_mut() else {
            return Out::Empty;
        };
        let _ = input.on_window_event(ctx.window(), event);

        let captured = self.egui.wants_pointer_input();
        if captured == self.pointer_captured {
            return Out::Empty;
        }
        self.pointer_captured = captured;
        Out::Configure(Box::new(move |ctx: &mut Context| {
            ctx.camera.controller.set_enabled(!captured)
        }))
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut SceneState, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::Custom(Box::new(|_: &Context, pass: &mut wgpu::RenderPass<'pass>| {
            self.painter.paint(pass)
        }))
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
